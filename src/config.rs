use std::collections::HashMap;
use std::net::{SocketAddr, IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::error::{self, Context};

mod shape;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// a config file to load and merge over the defaults. can be given
    /// more than once, later files win
    #[arg(long)]
    config: Vec<PathBuf>
}

#[derive(Debug)]
pub struct Db {
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub dbname: String,
}

#[derive(Debug)]
pub struct Session {
    pub key: String,
    pub secure: bool,
    pub domain: Option<String>,
}

#[derive(Debug)]
pub struct Sec {
    pub session: Session,
    pub stream_key: String,
}

#[derive(Debug)]
pub struct Listener {
    pub addr: SocketAddr,
}

#[derive(Debug)]
pub struct Settings {
    pub data: PathBuf,
    pub listeners: HashMap<String, Listener>,
    pub sec: Sec,
    pub db: Db,
}

impl Settings {
    fn default() -> Settings {
        Settings {
            data: PathBuf::from("./data"),
            listeners: HashMap::from([(
                String::from("main"),
                Listener {
                    addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000)
                }
            )]),
            sec: Sec {
                session: Session {
                    key: String::from("dev-key"),
                    secure: false,
                    domain: None,
                },
                stream_key: String::from("some_stream_key"),
            },
            db: Db {
                user: String::from("postgres"),
                password: None,
                host: String::from("localhost"),
                port: 5432,
                dbname: String::from("sks"),
            }
        }
    }

    fn merge(&mut self, loaded: shape::Settings) -> error::Result<()> {
        if let Some(data) = loaded.data {
            self.data = data;
        }

        if let Some(listeners) = loaded.listeners {
            for (key, listener) in listeners {
                let addr = SocketAddr::from_str(&listener.addr).context(format!(
                    "invalid socket address for listener \"{key}\": \"{}\"", listener.addr
                ))?;

                self.listeners.insert(key, Listener { addr });
            }
        }

        if let Some(sec) = loaded.sec {
            if let Some(session) = sec.session {
                if let Some(key) = session.key {
                    self.sec.session.key = key;
                }

                if let Some(secure) = session.secure {
                    self.sec.session.secure = secure;
                }

                if let Some(domain) = session.domain {
                    self.sec.session.domain = Some(domain);
                }
            }

            if let Some(stream_key) = sec.stream_key {
                self.sec.stream_key = stream_key;
            }
        }

        if let Some(db) = loaded.db {
            if let Some(user) = db.user {
                self.db.user = user;
            }

            if let Some(password) = db.password {
                self.db.password = Some(password);
            }

            if let Some(host) = db.host {
                self.db.host = host;
            }

            if let Some(port) = db.port {
                self.db.port = port;
            }

            if let Some(dbname) = db.dbname {
                self.db.dbname = dbname;
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
}

impl Config {
    pub fn from_args(args: CliArgs) -> error::Result<Self> {
        let mut settings = Settings::default();

        for config_path in args.config {
            tracing::debug!("loading config file \"{}\"", config_path.display());

            let loaded = Self::load_file(&config_path)?;

            settings.merge(loaded)?;
        }

        {
            let meta = std::fs::metadata(&settings.data).context(
                "failed to retrieve metadata for settings.data"
            )?;

            if !meta.is_dir() {
                return Err(error::Error::new().message(
                    "settings.data is not a directory"
                ));
            }
        }

        tracing::debug!("{settings:#?}");

        Ok(Config {
            settings
        })
    }

    fn load_file(path: &PathBuf) -> error::Result<shape::Settings> {
        let ext = path.extension().context(format!(
            "failed to retrieve the file extension for config file: \"{}\"", path.display()
        ))?;

        let ext = ext.to_ascii_lowercase();
        let file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .context(format!("failed to open config file: \"{}\"", path.display()))?;
        let reader = std::io::BufReader::new(file);

        if ext.eq("yaml") || ext.eq("yml") {
            serde_yaml::from_reader(reader).context(format!(
                "failed to parse yaml config file: \"{}\"", path.display()
            ))
        } else if ext.eq("json") {
            serde_json::from_reader(reader).context(format!(
                "failed to parse json config file: \"{}\"", path.display()
            ))
        } else {
            Err(error::Error::new().message(format!(
                "unknown type of config file: \"{}\"", path.display()
            )))
        }
    }
}

pub fn get_config() -> error::Result<Config> {
    Config::from_args(CliArgs::parse())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_overrides_defaults() {
        let mut settings = Settings::default();

        let loaded: shape::Settings = serde_yaml::from_str(
            "\
            sec:\n\
            \x20 stream_key: rotated\n\
            db:\n\
            \x20 dbname: sks_test\n"
        ).expect("failed to parse yaml settings");

        settings.merge(loaded).expect("failed to merge settings");

        assert_eq!(settings.sec.stream_key, "rotated");
        assert_eq!(settings.db.dbname, "sks_test");
        assert_eq!(settings.sec.session.key, "dev-key");
    }

    #[test]
    fn merge_rejects_invalid_listener_addr() {
        let mut settings = Settings::default();

        let loaded: shape::Settings = serde_yaml::from_str(
            "\
            listeners:\n\
            \x20 main:\n\
            \x20   addr: not-an-addr\n"
        ).expect("failed to parse yaml settings");

        assert!(settings.merge(loaded).is_err());
    }
}
