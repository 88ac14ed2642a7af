use std::fmt::{Display, Formatter};

/// 错误类型，所有前置条件的违反都以此报告
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub message: String,
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self { message: value }
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        format!("读写文件失败：{value}").into()
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        format!("配置文件解析错误：{value}").into()
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        format!("表格输出失败：{value}").into()
    }
}
