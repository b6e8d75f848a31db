//! Static mapping between language tags and file extensions.

/// Canonical extension per language tag
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("typescript", "ts"),
    ("python", "py"),
    ("css", "css"),
    ("scss", "scss"),
    ("html", "html"),
    ("vue", "vue"),
    ("php", "php"),
    ("ruby", "rb"),
    ("go", "go"),
    ("rust", "rs"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("text", "txt"),
];

/// Language per file extension (several extensions share a language)
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("css", "css"),
    ("scss", "scss"),
    ("html", "html"),
    ("vue", "vue"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
];

/// Returns the canonical extension for a language tag, `"txt"` if unknown.
pub fn extension_for(language: &str) -> &'static str {
    let language = language.trim().to_ascii_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, ext)| *ext)
        .unwrap_or("txt")
}

/// Infers the language tag from a filename's extension, `"text"` if the
/// extension is missing or unknown.
pub fn language_for(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return "text";
    };
    let ext = ext.to_ascii_lowercase();

    EXTENSION_LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or("text")
}
