pub mod number_parser;
