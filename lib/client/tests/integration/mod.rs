mod http;
mod repository;
mod test_utils;
