pub mod publish;
pub mod snapshot;
