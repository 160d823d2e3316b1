pub mod state_ops;
