// ABOUTME: SQL text for template database and extension statements
// ABOUTME: Quotes identifiers and literals so names reach the server verbatim

/// Quote an identifier (database or extension name) for use in SQL
///
/// Wraps the name in double quotes and doubles any embedded double quote, so
/// `template_postgis` becomes `"template_postgis"` and mixed-case or
/// hyphenated names such as `uuid-ossp` are preserved.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Quote a string literal (extension version) for use in SQL
///
/// No validation happens here. A malformed version is still sent and the
/// server rejects it.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn create_template_database_sql(name: &str) -> String {
    format!("CREATE DATABASE {} IS_TEMPLATE true", quote_identifier(name))
}

/// `CREATE EXTENSION IF NOT EXISTS`, pinned to `version` when one is given
pub fn create_extension_sql(extension: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!(
            "CREATE EXTENSION IF NOT EXISTS {} VERSION {}",
            quote_identifier(extension),
            quote_literal(v)
        ),
        None => format!("CREATE EXTENSION IF NOT EXISTS {}", quote_identifier(extension)),
    }
}

/// `ALTER EXTENSION ... UPDATE TO`; a no-op on the server when already current
pub fn update_extension_sql(extension: &str, version: &str) -> String {
    format!(
        "ALTER EXTENSION {} UPDATE TO {}",
        quote_identifier(extension),
        quote_literal(version)
    )
}
