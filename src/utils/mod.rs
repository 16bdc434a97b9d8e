pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    host_matches, is_messenger_host, is_platform_host, is_valid_url, normalize_start_url,
};
