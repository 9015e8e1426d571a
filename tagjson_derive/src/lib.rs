
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{
    parse_macro_input,
    spanned::Spanned,
    Attribute,
    Data,
    DataEnum,
    DeriveInput,
    Error,
    Fields,
    Lit,
    Meta,
    NestedMeta,
    Result,
};
use quote::quote;
use std::collections::HashSet;


/// Case conversion selected with `#[string_enum(rename_all = "...")]`.
#[derive(Clone, Copy)]
enum RenameAll {
    Lower,
    Upper,
    Snake,
    Kebab,
}

impl RenameAll {
    fn parse(lit: &Lit) -> Result<Self> {
        let s = match lit {
            Lit::Str(s) => s.value(),
            _ => return Err(Error::new(lit.span(), "rename_all must be a string")),
        };
        match s.as_str() {
            "lowercase" => Ok(RenameAll::Lower),
            "UPPERCASE" => Ok(RenameAll::Upper),
            "snake_case" => Ok(RenameAll::Snake),
            "kebab-case" => Ok(RenameAll::Kebab),
            _ => Err(Error::new(
                lit.span(),
                "unsupported rename_all, expected one of lowercase, UPPERCASE, snake_case, kebab-case",
            )),
        }
    }

    fn apply(self, ident: &str) -> String {
        match self {
            RenameAll::Lower => ident.to_lowercase(),
            RenameAll::Upper => ident.to_uppercase(),
            RenameAll::Snake => separate_words(ident, '_'),
            RenameAll::Kebab => separate_words(ident, '-'),
        }
    }
}

fn separate_words(ident: &str, sep: char) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in ident.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(sep);
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_lowercase());
    }
    out
}

/// Name/value pairs inside `#[string_enum(...)]` attributes.
fn string_enum_args(attrs: &[Attribute]) -> Result<Vec<(String, Lit)>> {
    let mut args = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path.is_ident("string_enum")) {
        let list = match attr.parse_meta()? {
            Meta::List(list) => list,
            meta => return Err(Error::new(
                meta.span(),
                "expected #[string_enum(name = \"value\")]",
            )),
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::NameValue(nv)) => {
                    let name = nv.path
                        .get_ident()
                        .map(|ident| ident.to_string())
                        .ok_or_else(|| Error::new(nv.path.span(), "expected identifier"))?;
                    args.push((name, nv.lit));
                },
                other => return Err(Error::new(
                    other.span(),
                    "attribute must be name/value style",
                )),
            }
        }
    }
    Ok(args)
}

fn expand(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let variants = match &input.data {
        &Data::Enum(DataEnum { ref variants, .. }) => variants,
        _ => return Err(Error::new(
            input.ident.span(),
            "StringEnum can only be derived on enums",
        )),
    };
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "StringEnum cannot be derived on a generic enum",
        ));
    }

    let mut rename_all = None;
    for (arg, lit) in string_enum_args(&input.attrs)? {
        match arg.as_str() {
            "rename_all" => rename_all = Some(RenameAll::parse(&lit)?),
            _ => return Err(Error::new(lit.span(), "unsupported attribute name")),
        }
    }

    let mut idents = Vec::new();
    let mut texts = Vec::new();
    let mut seen = HashSet::new();
    for variant in variants {
        match variant.fields {
            Fields::Unit => (),
            _ => return Err(Error::new(
                variant.span(),
                "StringEnum members cannot have fields",
            )),
        }
        let ident = variant.ident.to_string();
        let mut text = match rename_all {
            Some(rename_all) => rename_all.apply(&ident),
            None => ident,
        };
        for (arg, lit) in string_enum_args(&variant.attrs)? {
            match (arg.as_str(), lit) {
                ("rename", Lit::Str(s)) => text = s.value(),
                (_, lit) => return Err(Error::new(lit.span(), "unsupported attribute name")),
            }
        }
        if !seen.insert(text.clone()) {
            return Err(Error::new(
                variant.span(),
                format!("duplicate StringEnum text {:?}", text),
            ));
        }
        idents.push(&variant.ident);
        texts.push(text);
    }

    Ok(quote! {
        impl ::tagjson::StringEnum for #name {
            const MEMBERS: &'static [Self] = &[ #( Self::#idents, )* ];

            fn as_str(&self) -> &'static str {
                match *self {
                    #( Self::#idents => #texts, )*
                }
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(::tagjson::StringEnum::as_str(self))
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = ::tagjson::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                <Self as ::tagjson::StringEnum>::from_text(s)
            }
        }

        impl<'a> ::core::convert::TryFrom<&'a str> for #name {
            type Error = ::tagjson::Error;

            fn try_from(s: &'a str) -> ::core::result::Result<Self, Self::Error> {
                <Self as ::tagjson::StringEnum>::from_text(s)
            }
        }

        impl ::core::cmp::PartialEq for #name {
            fn eq(&self, other: &Self) -> bool {
                ::tagjson::StringEnum::as_str(self) == ::tagjson::StringEnum::as_str(other)
            }
        }

        impl ::core::cmp::Eq for #name {}

        impl ::core::hash::Hash for #name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(::tagjson::StringEnum::as_str(self), state)
            }
        }

        impl ::core::cmp::PartialEq<str> for #name {
            fn eq(&self, other: &str) -> bool {
                ::tagjson::StringEnum::as_str(self) == other
            }
        }

        impl<'a> ::core::cmp::PartialEq<&'a str> for #name {
            fn eq(&self, other: &&'a str) -> bool {
                ::tagjson::StringEnum::as_str(self) == *other
            }
        }

        impl ::core::cmp::PartialEq<::std::string::String> for #name {
            fn eq(&self, other: &::std::string::String) -> bool {
                ::tagjson::StringEnum::as_str(self) == other.as_str()
            }
        }

        impl ::core::cmp::PartialEq<#name> for str {
            fn eq(&self, other: &#name) -> bool {
                self == ::tagjson::StringEnum::as_str(other)
            }
        }

        impl<'a> ::core::cmp::PartialEq<#name> for &'a str {
            fn eq(&self, other: &#name) -> bool {
                *self == ::tagjson::StringEnum::as_str(other)
            }
        }

        impl ::core::cmp::PartialEq<#name> for ::std::string::String {
            fn eq(&self, other: &#name) -> bool {
                self.as_str() == ::tagjson::StringEnum::as_str(other)
            }
        }

        impl ::core::convert::AsRef<str> for #name {
            fn as_ref(&self) -> &str {
                ::tagjson::StringEnum::as_str(self)
            }
        }

        impl ::core::borrow::Borrow<str> for #name {
            fn borrow(&self) -> &str {
                ::tagjson::StringEnum::as_str(self)
            }
        }

        impl ::tagjson::serde::Serialize for #name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::tagjson::serde::Serializer,
            {
                ::tagjson::string_enum::serialize_member(self, serializer)
            }
        }

        impl<'de> ::tagjson::serde::Deserialize<'de> for #name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::tagjson::serde::Deserializer<'de>,
            {
                ::tagjson::string_enum::deserialize_member(deserializer)
            }
        }

        impl ::core::convert::From<#name> for ::tagjson::Value {
            fn from(member: #name) -> Self {
                ::tagjson::Value::String(
                    ::std::string::String::from(::tagjson::StringEnum::as_str(&member))
                )
            }
        }
    })
}

#[proc_macro_derive(StringEnum, attributes(string_enum))]
pub fn derive_string_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
