/// 引擎配置 - 下单引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | 是否输出 JSON 日志 |
/// | LOG_DIR | (unset) | 日志文件目录 |
/// | MAX_LINE_QUANTITY | 9999 | 单行最大数量 |
/// | MAX_NOTE_LEN | 500 | 备注最大长度 |
/// | MAX_ADDRESS_LEN | 500 | 地址最大长度 |
/// | MAX_PHONE_LEN | 100 | 电话最大长度 |
/// | MAX_NAME_LEN | 100 | 顾客/员工姓名最大长度 |
///
/// The delivery fee is a business constant ([`crate::order_money::DELIVERY_FEE`]),
/// not a configuration value.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// JSON 日志格式
    pub log_json: bool,
    /// 日志目录 (None = 仅控制台)
    pub log_dir: Option<String>,
    /// 输入长度与数量上限
    pub limits: Limits,
}

/// Input limits applied by the cart and the order composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Hard cap per line, independent of stock
    pub max_line_quantity: i32,
    pub max_note_len: usize,
    pub max_address_len: usize,
    pub max_phone_len: usize,
    pub max_name_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_quantity: 9999,
            max_note_len: 500,
            max_address_len: 500,
            max_phone_len: 100,
            max_name_len: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    parse_or(std::env::var(key).ok(), default)
}

/// Unset or unparsable values fall back to `default`
fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let defaults = Limits::default();
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            limits: Limits {
                max_line_quantity: env_or("MAX_LINE_QUANTITY", defaults.max_line_quantity),
                max_note_len: env_or("MAX_NOTE_LEN", defaults.max_note_len),
                max_address_len: env_or("MAX_ADDRESS_LEN", defaults.max_address_len),
                max_phone_len: env_or("MAX_PHONE_LEN", defaults.max_phone_len),
                max_name_len: env_or("MAX_NAME_LEN", defaults.max_name_len),
            },
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            limits: Limits::default(),
        }
    }
}
