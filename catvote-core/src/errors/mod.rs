mod coordinator;

pub use coordinator::CoordinatorError;
