use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields, Meta};

/// 生成 Model trait 的实现
///
/// 为每个具名字段生成 `FIELDS` 声明，字段标签由 `#[db = "..."]`（列名）和
/// `#[qbr = "..."]`（指令）拼接而成；没有 `#[db]` 的字段不会映射到列。
///
/// 使用示例：
/// ```ignore
/// #[derive(qbr::Model)]
/// struct User {
///     #[db = "id"]
///     #[qbr = "ignore_on=insert,update"]
///     id: i64,
///     #[db = "name"]
///     name: String,
///     // 不参与持久化
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(db, qbr))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_model(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

/// 字段上的两个标签通道
struct FieldTags {
    db: Option<String>,
    qbr: Option<String>,
}

fn expand_model(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // 获取字段列表（必须是具名字段的结构体）
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Model derive only supports structs with named fields",
            ));
        }
    };

    let mut field_decls = Vec::new();
    let mut mapped_names = Vec::new();
    let mut mapped_idents = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "model fields must be named"));
        };
        // `r#type` 注册为 `type`
        let field_name = ident.unraw().to_string();
        let tags = parse_field_tags(field)?;

        let tag = compose_tag(&tags);
        field_decls.push(quote! {
            ::qbr::StructField::new(#field_name, #tag)
        });

        // 只有映射到列的字段才需要取值，其它字段的类型不要求实现 ToValue
        if tags.db.as_deref().is_some_and(|db| !db.is_empty()) {
            mapped_names.push(field_name);
            mapped_idents.push(ident);
        }
    }

    Ok(quote! {
        impl #impl_generics ::qbr::Model for #name #ty_generics #where_clause {
            const FIELDS: &'static [::qbr::StructField<'static>] = &[
                #(#field_decls,)*
            ];

            fn schema() -> &'static ::qbr::Schema {
                static SCHEMA: ::std::sync::OnceLock<::qbr::Schema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| ::qbr::Schema::from_fields(<Self as ::qbr::Model>::FIELDS))
            }

            fn field_value(&self, field_name: &str) -> ::std::option::Option<::qbr::Value> {
                match field_name {
                    #(
                        #mapped_names => ::std::option::Option::Some(
                            ::qbr::ToValue::to_value(&self.#mapped_idents)
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

/// 解析 `#[db = "..."]` 与 `#[qbr = "..."]`
fn parse_field_tags(field: &syn::Field) -> syn::Result<FieldTags> {
    let mut tags = FieldTags { db: None, qbr: None };

    for attr in &field.attrs {
        let slot = if attr.path().is_ident("db") {
            &mut tags.db
        } else if attr.path().is_ident("qbr") {
            &mut tags.qbr
        } else {
            continue;
        };

        let value = match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => s.value(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "expected a string literal, e.g. #[db = \"name\"]",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected name-value attribute, e.g. #[db = \"name\"]",
                ));
            }
        };

        if slot.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate tag attribute"));
        }
        *slot = Some(value);
    }

    Ok(tags)
}

/// 拼接字段标签：`db:"..." qbr:"..."`，转义 `\` 与 `"`
fn compose_tag(tags: &FieldTags) -> String {
    let mut tag = String::new();
    for (key, value) in [("db", &tags.db), ("qbr", &tags.qbr)] {
        let Some(value) = value else {
            continue;
        };
        if !tag.is_empty() {
            tag.push(' ');
        }
        tag.push_str(key);
        tag.push_str(":\"");
        for c in value.chars() {
            match c {
                '\\' | '"' => {
                    tag.push('\\');
                    tag.push(c);
                }
                '\n' => tag.push_str("\\n"),
                '\t' => tag.push_str("\\t"),
                '\r' => tag.push_str("\\r"),
                _ => tag.push(c),
            }
        }
        tag.push('"');
    }
    tag
}
