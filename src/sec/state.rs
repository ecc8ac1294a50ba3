use crate::config;

use super::authn::stream_key::StreamKeys;

pub struct SessionInfo {
    key: Vec<u8>,
    domain: Option<String>,
    secure: bool,
}

impl SessionInfo {
    pub fn from_config(config: &config::Config) -> Self {
        tracing::debug!("creating SessionInfo state");

        SessionInfo {
            key: config.settings.sec.session.key.clone().into_bytes(),
            domain: config.settings.sec.session.domain.clone(),
            secure: config.settings.sec.session.secure,
        }
    }

    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    pub fn domain(&self) -> Option<&String> {
        self.domain.as_ref()
    }

    pub fn secure(&self) -> &bool {
        &self.secure
    }
}

pub struct Sec {
    session_info: SessionInfo,
    stream_keys: StreamKeys,
}

impl Sec {
    pub fn from_config(config: &config::Config) -> Sec {
        tracing::debug!("creating Sec state");

        Sec {
            session_info: SessionInfo::from_config(config),
            stream_keys: StreamKeys::new(&config.settings.sec.stream_key),
        }
    }

    pub fn session_info(&self) -> &SessionInfo {
        &self.session_info
    }

    pub fn stream_keys(&self) -> &StreamKeys {
        &self.stream_keys
    }
}

#[cfg(test)]
impl Sec {
    pub fn test_state() -> Sec {
        Sec {
            session_info: SessionInfo {
                key: b"dev-key".to_vec(),
                domain: None,
                secure: false,
            },
            stream_keys: StreamKeys::new("some_stream_key"),
        }
    }
}
