//! MySQL DSN 解析
//!
//! 支持 `user:pass@tcp(host:port)/dbname?param=value` 形式。
//! 凭据以最后一个 `@` 分隔，数据库名以最后一个 `/` 分隔

use hello_errors::{AppError, AppResult};
use sqlx::mysql::MySqlConnectOptions;
use tracing::debug;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3306;

/// 连接地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySqlAddr {
    Tcp { host: String, port: u16 },
    Unix { path: String },
}

/// 解析后的 DSN
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlDsn {
    pub user: String,
    pub password: String,
    pub addr: MySqlAddr,
    pub database: String,
    pub params: Vec<(String, String)>,
}

impl std::fmt::Debug for MySqlDsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlDsn")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("addr", &self.addr)
            .field("database", &self.database)
            .field("params", &self.params)
            .finish()
    }
}

impl MySqlDsn {
    /// 解析 DSN 字符串
    pub fn parse(dsn: &str) -> AppResult<Self> {
        let slash = dsn.rfind('/').ok_or_else(|| {
            AppError::database("Invalid DSN: missing the slash separating the database name")
        })?;
        let (left, right) = (&dsn[..slash], &dsn[slash + 1..]);

        let (user, password, rest) = match left.rfind('@') {
            Some(at) => {
                let (user, password) = match left[..at].split_once(':') {
                    Some((user, password)) => (user, password),
                    None => (&left[..at], ""),
                };
                (user.to_string(), password.to_string(), &left[at + 1..])
            }
            None => (String::new(), String::new(), left),
        };

        let (net, addr) = match rest.find('(') {
            Some(open) => {
                let addr = rest[open + 1..].strip_suffix(')').ok_or_else(|| {
                    AppError::database("Invalid DSN: network address not terminated (missing closing brace)")
                })?;
                (&rest[..open], addr)
            }
            None => (rest, ""),
        };

        let addr = match net {
            "" | "tcp" => parse_tcp_addr(addr)?,
            "unix" => MySqlAddr::Unix {
                path: addr.to_string(),
            },
            other => {
                return Err(AppError::database(format!(
                    "Invalid DSN: unsupported network {:?}",
                    other
                )));
            }
        };

        let (database, query) = right.split_once('?').unwrap_or((right, ""));
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Ok(Self {
            user,
            password,
            addr,
            database: database.to_string(),
            params,
        })
    }

    /// 查找参数值
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 转换为 sqlx 连接选项
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new();

        options = match &self.addr {
            MySqlAddr::Tcp { host, port } => options.host(host).port(*port),
            MySqlAddr::Unix { path } => options.socket(path),
        };

        if !self.user.is_empty() {
            options = options.username(&self.user);
        }
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if !self.database.is_empty() {
            options = options.database(&self.database);
        }

        for (key, value) in &self.params {
            match key.as_str() {
                // 多个候选字符集时取第一个
                "charset" => {
                    if let Some(charset) = value.split(',').next().filter(|c| !c.is_empty()) {
                        options = options.charset(charset);
                    }
                }
                "collation" => options = options.collation(value),
                // 驱动总是解码时间类型
                "parseTime" => {}
                _ => debug!(param = %key, "Ignoring unsupported DSN parameter"),
            }
        }

        options
    }
}

fn parse_tcp_addr(addr: &str) -> AppResult<MySqlAddr> {
    let (host, port) = match addr.rsplit_once(':') {
        Some((host, port)) => (host, port),
        None => (addr, ""),
    };

    let port = if port.is_empty() {
        DEFAULT_PORT
    } else {
        port.parse::<u16>()
            .map_err(|e| AppError::database(format!("Invalid DSN: bad port {:?}: {}", port, e)))?
    };

    let host = if host.is_empty() { DEFAULT_HOST } else { host };

    Ok(MySqlAddr::Tcp {
        host: host.to_string(),
        port,
    })
}
