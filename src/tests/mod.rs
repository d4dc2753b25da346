mod utils;

mod test_logger;
