pub mod deepseek;
mod http_errors;
