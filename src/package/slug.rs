use super::AliasTable;

/// Resolve a mod key to its catalog slug.
///
/// The camel-case form of the key is looked up in `aliases`; an alias replaces
/// the generated slug entirely.
pub fn resolve_slug(key: &str, aliases: &AliasTable) -> String {
    let generated = camel_case_slug(key);
    match aliases.get(&generated) {
        Some(alias) => alias.to_string(),
        None => generated,
    }
}

/// `MouseTweaks` -> `mouse-tweaks`.
///
/// Tokens are runs that start with an uppercase letter. When the key has an
/// uppercase letter past its first character, anything before the first
/// uppercase letter is dropped (`modMenu` -> `menu`). Otherwise the whole key
/// is a single token and is only lower-cased.
pub fn camel_case_slug(key: &str) -> String {
    if !key.chars().skip(1).any(char::is_uppercase) {
        return key.to_lowercase();
    }

    let mut tokens: Vec<String> = Vec::new();
    for c in key.chars() {
        if c.is_uppercase() {
            tokens.push(String::new());
        }
        if let Some(current) = tokens.last_mut() {
            current.extend(c.to_lowercase());
        }
    }

    tokens.join("-")
}
