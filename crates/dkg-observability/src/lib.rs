mod blockchain;
mod publish;
mod queue;
mod registration;
mod task;

pub use blockchain::*;
pub use publish::*;
pub use queue::*;
pub use registration::*;
pub use task::*;
