//! 结构体标签解析
//!
//! 标签字符串采用约定格式：`key:"value" key2:"value2"`，键与值之间用冒号连接，
//! 值为带反斜杠转义的双引号字符串，多个键值对之间用空格分隔。

use std::borrow::Cow;

/// 字段标签，例如 `db:"name" qbr:"ignore_on=insert,update"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    pub const fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    /// 原始标签字符串
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// 返回 `key` 对应的值；如果 key 不存在则返回空字符串
    pub fn get(&self, key: &str) -> Cow<'a, str> {
        self.lookup(key).unwrap_or(Cow::Borrowed(""))
    }

    /// 查找 `key` 对应的值
    ///
    /// 标签格式不合法时停止扫描，之后的键一律视为不存在。
    /// 值中没有转义字符时直接借用原字符串。
    pub fn lookup(&self, key: &str) -> Option<Cow<'a, str>> {
        let mut tag = self.0;

        while !tag.is_empty() {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                break;
            }

            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                break;
            }
            let name = &tag[..i];
            tag = &tag[i + 1..];

            // 扫描引号内的值
            let bytes = tag.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let quoted = &tag[..=i];
            tag = &tag[i + 1..];

            if name == key {
                return unquote(quoted);
            }
        }

        None
    }
}

impl<'a> From<&'a str> for StructTag<'a> {
    fn from(raw: &'a str) -> Self {
        Self(raw)
    }
}

/// 去掉首尾双引号并处理转义；转义非法时返回 None
fn unquote(quoted: &str) -> Option<Cow<'_, str>> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if !inner.contains('\\') {
        return Some(Cow::Borrowed(inner));
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '\\' => '\\',
            '"' => '"',
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            _ => return None,
        };
        out.push(escaped);
    }
    Some(Cow::Owned(out))
}
