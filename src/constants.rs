pub mod auth {

    /// Every bearer token is this prefix followed by the trimmed username.
    pub const TOKEN_PREFIX: &str = "simple-token-";

    pub const TOKEN_TYPE: &str = "bearer";
}

pub mod premium {

    pub const UPGRADE_URL: &str = "/premium/upgrade";
}

pub mod limits {

    pub const MAX_FACTORIAL: u32 = 50;

    pub const WORDS_PER_MINUTE: usize = 200;
}
