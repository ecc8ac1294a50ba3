use std::path::PathBuf;
use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Db {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub key: Option<String>,
    pub secure: Option<bool>,
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Sec {
    pub session: Option<Session>,

    /// shared secret the stream keys are signed with. rotating it
    /// invalidates every key issued so far
    pub stream_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Listener {
    pub addr: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub data: Option<PathBuf>,

    pub listeners: Option<HashMap<String, Listener>>,

    pub sec: Option<Sec>,
    pub db: Option<Db>,
}
