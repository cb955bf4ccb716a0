pub mod toml_backend;
