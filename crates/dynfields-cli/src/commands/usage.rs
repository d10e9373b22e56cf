use dynfields::Config;

/// Print a compact command reference.
pub fn run(config: &Config) {
    let env_hint = if std::env::var_os("DYNFIELDS_CONFIG").is_some() {
        " (set)"
    } else {
        ""
    };
    let sep = &config.path_separator;

    print!(
        r#"dynfields — select fields of nested JSON documents

COMMANDS:
  dynfields project [FILE]                        Print FILE (or stdin) with selected fields
    [--fields LIST] [--omit LIST]                 Comma-separated paths, e.g. id,pet{sep}name
    [--query QUERY]                               Read selectors from "?fields=...&omit=..."
  dynfields explain [FILE]                        Declared vs retained fields per node
    [--fields LIST] [--omit LIST] [--query QUERY]
  dynfields usage                                 This reference

SELECTORS:
  fields absent          keep everything
  fields= (blank)        keep nothing at the top level
  fields=a{sep}b            keep a at the top level and b inside a
  fields=a               keep a with all of its own fields
  omit=a{sep}b              drop b inside a; omit wins over fields

GLOBAL OPTIONS:
  --format human|json    Force output format (auto-detected by default)
  --config PATH          Config file (fields_param, omit_param, path_separator, list_separator)
  --path-separator SEP   Override the path separator
  -v, --verbose          Log per-node resolution to stderr

CONFIG (in precedence order):
  1. --config flag
  2. $DYNFIELDS_CONFIG env var{env_hint}
  3. ~/.config/dynfields/config.toml
"#
    );
}
