use syn::{Attribute, Expr, ExprLit, Lit, Meta, Token, parse::Parse, parse::ParseStream};

/// Contents of a `#[flag(...)]` field attribute.
///
/// Accepts `#[flag("c,count")]`, `#[flag(names = "c,count", desc = "...")]`
/// or a leading name list followed by `desc = "..."`.
#[derive(Debug, Default)]
pub(crate) struct FlagAttr {
    pub names: String,
    pub desc: Option<String>,
}

impl Parse for FlagAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attr = FlagAttr::default();

        if input.peek(syn::LitStr) {
            let names_lit: syn::LitStr = input.parse()?;
            attr.names = names_lit.value();
            if !input.peek(Token![,]) {
                return Ok(attr);
            }
            let _comma: Token![,] = input.parse()?;
        }

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;

            match ident.to_string().as_str() {
                "names" => {
                    let _eq: Token![=] = input.parse()?;
                    let names_lit: syn::LitStr = input.parse()?;
                    attr.names = names_lit.value();
                }
                "desc" => {
                    let _eq: Token![=] = input.parse()?;
                    let desc_lit: syn::LitStr = input.parse()?;
                    attr.desc = Some(desc_lit.value());
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        "unknown parameter, expected `names` or `desc`",
                    ));
                }
            }

            if input.peek(Token![,]) {
                let _comma: Token![,] = input.parse()?;
            }
        }
        Ok(attr)
    }
}

/// The field's `///` comment, lines trimmed and joined with spaces.
pub(crate) fn doc_comment(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
