pub mod file_util;
