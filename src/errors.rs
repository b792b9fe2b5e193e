use std::fmt;

#[derive(Debug, Clone)]
pub enum BrandtrackerError {
    Validation(String),
    NotFound(String),
    Permission(String),
    Store(String),
    Serialization(String),
    FileOperation(String),
    Config(String),
    DateParse(String),
}

impl BrandtrackerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BrandtrackerError::Validation(_) => "E001",
            BrandtrackerError::NotFound(_) => "E002",
            BrandtrackerError::Permission(_) => "E003",
            BrandtrackerError::Store(_) => "E004",
            BrandtrackerError::Serialization(_) => "E005",
            BrandtrackerError::FileOperation(_) => "E006",
            BrandtrackerError::Config(_) => "E007",
            BrandtrackerError::DateParse(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BrandtrackerError::Validation(_) => "Validation Error",
            BrandtrackerError::NotFound(_) => "Resource Not Found",
            BrandtrackerError::Permission(_) => "Permission Denied",
            BrandtrackerError::Store(_) => "Store Error",
            BrandtrackerError::Serialization(_) => "Serialization Error",
            BrandtrackerError::FileOperation(_) => "File Operation Error",
            BrandtrackerError::Config(_) => "Configuration Error",
            BrandtrackerError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BrandtrackerError::Validation(msg)
            | BrandtrackerError::NotFound(msg)
            | BrandtrackerError::Permission(msg)
            | BrandtrackerError::Store(msg)
            | BrandtrackerError::Serialization(msg)
            | BrandtrackerError::FileOperation(msg)
            | BrandtrackerError::Config(msg)
            | BrandtrackerError::DateParse(msg) => msg,
        }
    }

    /// Whether the failure happened before anything was written.
    ///
    /// Validation, lookup and permission failures abort an operation up front;
    /// store and I/O failures may leave one of two writes applied.
    pub fn is_pre_write(&self) -> bool {
        matches!(
            self,
            BrandtrackerError::Validation(_)
                | BrandtrackerError::NotFound(_)
                | BrandtrackerError::Permission(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于日志）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BrandtrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BrandtrackerError {}

// 便捷的构造函数
impl BrandtrackerError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::NotFound(msg.into())
    }

    pub fn permission<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::Permission(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::Store(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::FileOperation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::Config(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        BrandtrackerError::DateParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for BrandtrackerError {
    fn from(err: std::io::Error) -> Self {
        BrandtrackerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BrandtrackerError {
    fn from(err: serde_json::Error) -> Self {
        BrandtrackerError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for BrandtrackerError {
    fn from(err: chrono::ParseError) -> Self {
        BrandtrackerError::DateParse(err.to_string())
    }
}

impl From<toml::ser::Error> for BrandtrackerError {
    fn from(err: toml::ser::Error) -> Self {
        BrandtrackerError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for BrandtrackerError {
    fn from(err: csv::Error) -> Self {
        BrandtrackerError::FileOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BrandtrackerError>;
