mod common;

mod test_config;
mod test_steepest;
