pub const USERS_PATH: &str = "users";

pub const USER_AGENT: &str = "OpenAgri-Users/1.0";

pub mod api {

    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

    pub const BASE_URL_ENV: &str = "OPENAGRI_API_URL";

    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
}

pub mod pagination {

    pub const DEFAULT_SKIP: u32 = 0;

    pub const DEFAULT_LIMIT: u32 = 100;
}

pub mod validation {

    pub const MIN_USERNAME_LEN: usize = 3;

    pub const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";
}
