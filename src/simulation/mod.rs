pub mod rate_walk;
