use anyhow::{Context, Result};
use qbr::macros_api::compose_tag;
use qbr::{Schema, StructField, TagKeys};
use serde::Serialize;
use syn::ext::IdentExt;

/// 源文件中带标签的结构体
#[derive(Debug, Clone)]
pub struct StructInfo {
    pub name: String,
    pub fields: Vec<FieldInfo>,
}

/// 结构体字段及其拼接后的标签
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub tag: String,
}

/// 输出用的结构体 schema
#[derive(Debug, Serialize)]
pub struct StructReport {
    pub file: String,
    #[serde(rename = "struct")]
    pub name: String,
    #[serde(flatten)]
    pub schema: Schema,
}

impl StructInfo {
    /// 使用指定标签键构建 schema
    pub fn schema(&self, keys: &TagKeys) -> Schema {
        let fields: Vec<StructField<'_>> = self
            .fields
            .iter()
            .map(|f| StructField::new(&f.name, &f.tag))
            .collect();
        Schema::with_keys(keys, &fields)
    }
}

/// 解析 Rust 源码，收集字段上带有列名或指令属性的结构体
///
/// 属性名与 `keys` 一致，例如默认读取 `#[db = "..."]` 与 `#[qbr = "..."]`。
pub fn parse_source(source: &str, keys: &TagKeys) -> Result<Vec<StructInfo>> {
    let file = syn::parse_file(source).context("Failed to parse Rust source")?;
    let mut structs = Vec::new();
    collect_items(&file.items, keys, &mut structs)?;
    Ok(structs)
}

fn collect_items(items: &[syn::Item], keys: &TagKeys, out: &mut Vec<StructInfo>) -> Result<()> {
    for item in items {
        match item {
            syn::Item::Struct(item_struct) => {
                if let Some(info) = struct_info(item_struct, keys)? {
                    out.push(info);
                }
            }
            // 内联模块
            syn::Item::Mod(item_mod) => {
                if let Some((_, items)) = &item_mod.content {
                    collect_items(items, keys, out)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn struct_info(item: &syn::ItemStruct, keys: &TagKeys) -> Result<Option<StructInfo>> {
    let syn::Fields::Named(named) = &item.fields else {
        return Ok(None);
    };

    let mut fields = Vec::new();
    let mut tagged = false;

    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let field_name = ident.unraw().to_string();
        let mut pairs: Vec<(&str, String)> = Vec::new();
        for key in [keys.column.as_str(), keys.directive.as_str()] {
            let mut found = false;
            for attr in &field.attrs {
                if !attr.path().is_ident(key) {
                    continue;
                }
                if found {
                    anyhow::bail!(
                        "duplicate tag attribute #[{}] on field '{}.{}'",
                        key,
                        item.ident,
                        field_name
                    );
                }
                found = true;
                let value = attr_string(attr).with_context(|| {
                    format!("Invalid #[{}] on field '{}.{}'", key, item.ident, field_name)
                })?;
                pairs.push((key, value));
            }
        }

        tagged |= !pairs.is_empty();
        fields.push(FieldInfo {
            name: field_name,
            tag: compose_tag(pairs.iter().map(|(k, v)| (*k, v.as_str()))),
        });
    }

    if !tagged {
        return Ok(None);
    }

    Ok(Some(StructInfo {
        name: item.ident.to_string(),
        fields,
    }))
}

fn attr_string(attr: &syn::Attribute) -> Result<String> {
    let syn::Meta::NameValue(nv) = &attr.meta else {
        anyhow::bail!("expected a name-value attribute");
    };
    match &nv.value {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(s),
            ..
        }) => Ok(s.value()),
        _ => anyhow::bail!("expected a string literal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qbr::OperationType;

    const SOURCE: &str = r#"
        #[derive(qbr::Model)]
        pub struct User {
            #[db = "id"]
            #[qbr = "ignore_on=insert,update"]
            pub id: i64,
            #[db = "name"]
            pub name: String,
            pub cache: Vec<u8>,
        }

        pub struct Plain {
            pub x: i32,
        }

        mod nested {
            struct Order {
                #[db = "order_no"]
                #[qbr = "ignore_on=Update"]
                no: String,
            }
        }
    "#;

    #[test]
    fn collects_tagged_structs() {
        let structs = parse_source(SOURCE, &TagKeys::default()).unwrap();
        let names: Vec<&str> = structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["User", "Order"]);

        let user = &structs[0];
        assert_eq!(user.fields.len(), 3);
        assert_eq!(user.fields[0].tag, r#"db:"id" qbr:"ignore_on=insert,update""#);
        assert_eq!(user.fields[2].tag, "");
    }

    #[test]
    fn builds_schema_from_source() {
        let keys = TagKeys::default();
        let structs = parse_source(SOURCE, &keys).unwrap();

        let schema = structs[0].schema(&keys);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.columns(&OperationType::insert()), ["name"]);

        let order = structs[1].schema(&keys);
        assert!(order
            .get("no")
            .unwrap()
            .is_ignored(&OperationType::update()));
    }

    #[test]
    fn custom_attribute_names() {
        let keys = TagKeys {
            column: "column".to_string(),
            directive: "meta".to_string(),
        };
        let source = r#"
            struct A {
                #[column = "a"]
                #[meta = "ignore_on=select"]
                a: i32,
                #[db = "b"]
                b: i32,
            }
        "#;
        let structs = parse_source(source, &keys).unwrap();
        let schema = structs[0].schema(&keys);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.columns(&OperationType::select()), Vec::<&str>::new());
    }

    #[test]
    fn duplicate_attribute_is_an_error() {
        let source = r#"
            struct A {
                #[db = "a"]
                #[db = "b"]
                a: i32,
            }
        "#;
        let err = parse_source(source, &TagKeys::default()).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate tag attribute #[db]"));
    }

    #[test]
    fn raw_identifiers_are_unprefixed() {
        let source = r#"
            struct A {
                #[db = "type"]
                r#type: String,
            }
        "#;
        let keys = TagKeys::default();
        let structs = parse_source(source, &keys).unwrap();
        assert_eq!(structs[0].fields[0].name, "type");
        assert_eq!(structs[0].schema(&keys).get("type").unwrap().column(), "type");
    }

    #[test]
    fn non_string_attribute_is_an_error() {
        let err = parse_source("struct A { #[db = 1] a: i32 }", &TagKeys::default()).unwrap_err();
        assert!(format!("{err:#}").contains("A.a"));
    }
}
