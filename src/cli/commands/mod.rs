mod seed;

pub use seed::cmd_seed;
