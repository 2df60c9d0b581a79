use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use redis::Commands;

use crate::config::Config;

pub trait SignalStore {
    fn get(&mut self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// `HOUSE_<id>_COUNT`, shared by both strategies so stored state survives a
/// strategy switch.
pub fn count_key(house_id: &str) -> String {
    format!("HOUSE_{house_id}_COUNT")
}

pub struct RedisStore {
    connection: redis::Connection,
}

impl RedisStore {
    pub fn connect(config: &Config) -> Result<Self> {
        let url = connection_url(&config.redis_network, &config.redis_port)?;
        let client = redis::Client::open(url.as_str()).wrap_err("invalid redis address")?;
        let connection = client
            .get_connection()
            .wrap_err_with(|| format!("failed to connect to redis at {url}"))?;
        Ok(Self { connection })
    }
}

fn connection_url(network: &str, addr: &str) -> Result<String> {
    match network {
        "tcp" => Ok(format!("redis://{addr}")),
        "unix" => Ok(format!("unix://{addr}")),
        other => Err(eyre!("unsupported redis network: {other}")),
    }
}

impl SignalStore for RedisStore {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self.connection.get(key)?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.connection.set::<_, _, ()>(key, value)?;
        Ok(())
    }
}
