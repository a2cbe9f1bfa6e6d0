//! Reference extraction from JavaScript sources.
//!
//! Recognizes ES `import … from` and CommonJS `require(…)` call forms, plus
//! declared `export` names. Nothing deeper — no scope analysis, no dynamic
//! import evaluation.

use std::sync::LazyLock;

use regex::Regex;
use weft_core::{ModuleKind, RefKind};

use crate::RawReference;

/// Everything extracted from one script file.
///
/// # Examples
///
/// ```
/// use weft_core::ModuleKind;
/// use weft_extract::js::extract_js;
///
/// let module = extract_js("import { render } from './dom.js';\nexport function start() {}");
/// assert_eq!(module.kind, ModuleKind::EsModule);
/// assert_eq!(module.references.len(), 1);
/// assert_eq!(module.exports[0].name, "start");
/// ```
#[derive(Debug, Clone)]
pub struct JsModule {
    /// Import and require references in source order.
    pub references: Vec<RawReference>,
    /// Declared exports.
    pub exports: Vec<JsExport>,
    /// Detected module system.
    pub kind: ModuleKind,
}

/// A declared `export` binding.
///
/// # Examples
///
/// ```
/// use weft_extract::js::extract_js;
///
/// let module = extract_js("export default class App {}");
/// assert!(module.exports[0].default);
/// assert_eq!(module.exports[0].binding, "class");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsExport {
    /// The exported identifier.
    pub name: String,
    /// Whether this is the default export.
    pub default: bool,
    /// Binding form: `class`, `function`, `const`, `let`, or `var`.
    pub binding: String,
}

/// Extract imports, exports, and the module kind from script text.
pub fn extract_js(text: &str) -> JsModule {
    static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"import\s+[^;\n]*?from\s+["']([^"']+)["']"#).unwrap()
    });
    static REQUIRE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"require\(\s*["']([^"']+)["']\s*\)"#).unwrap());
    static EXPORT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"export\s+(default\s+)?(class|function|const|let|var)\s+(\w+)").unwrap()
    });

    let mut module = JsModule {
        references: Vec::new(),
        exports: Vec::new(),
        kind: module_kind(text),
    };

    for capture in IMPORT.captures_iter(text) {
        module
            .references
            .push(RawReference::new(RefKind::JsImport, &capture[1]));
    }
    for capture in REQUIRE.captures_iter(text) {
        module
            .references
            .push(RawReference::new(RefKind::JsRequire, &capture[1]));
    }
    for capture in EXPORT.captures_iter(text) {
        module.exports.push(JsExport {
            name: capture[3].to_string(),
            default: capture.get(1).is_some(),
            binding: capture[2].to_string(),
        });
    }

    module
}

/// Detect the module system: any `import`/`export` wins, then CommonJS
/// markers, else a plain script.
pub fn module_kind(text: &str) -> ModuleKind {
    if text.contains("import ") || text.contains("export ") {
        ModuleKind::EsModule
    } else if text.contains("module.exports") || text.contains("require(") {
        ModuleKind::CommonJs
    } else {
        ModuleKind::Script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_es_imports() {
        let module = extract_js("import { a, b } from './util.js';");
        assert_eq!(
            module.references,
            vec![RawReference::new(RefKind::JsImport, "./util.js")]
        );
        assert_eq!(module.kind, ModuleKind::EsModule);
    }

    #[test]
    fn extracts_requires() {
        let module = extract_js("const fs = require('./storage.js');");
        assert_eq!(
            module.references,
            vec![RawReference::new(RefKind::JsRequire, "./storage.js")]
        );
        assert_eq!(module.kind, ModuleKind::CommonJs);
    }

    #[test]
    fn extracts_exports_with_binding_and_default_flag() {
        let src = r#"
export default class App {}
export function init() {}
export const VERSION = '1.0';
"#;
        let module = extract_js(src);
        assert_eq!(
            module.exports,
            vec![
                JsExport {
                    name: "App".into(),
                    default: true,
                    binding: "class".into()
                },
                JsExport {
                    name: "init".into(),
                    default: false,
                    binding: "function".into()
                },
                JsExport {
                    name: "VERSION".into(),
                    default: false,
                    binding: "const".into()
                },
            ]
        );
    }

    #[test]
    fn plain_script_has_no_module_syntax() {
        let module = extract_js("function run() { console.log('hi'); }\nrun();");
        assert_eq!(module.kind, ModuleKind::Script);
        assert!(module.references.is_empty());
        assert!(module.exports.is_empty());
    }

    #[test]
    fn module_exports_marks_commonjs() {
        assert_eq!(
            module_kind("module.exports = { run };"),
            ModuleKind::CommonJs
        );
    }

    #[test]
    fn import_and_require_can_coexist() {
        // `import` wins the kind, but both reference forms are extracted.
        let module = extract_js("import x from './a.js';\nconst y = require('./b.js');");
        assert_eq!(module.kind, ModuleKind::EsModule);
        assert_eq!(module.references.len(), 2);
    }

    #[test]
    fn bare_specifiers_pass_through_verbatim() {
        let module = extract_js("import lodash from 'lodash';");
        assert_eq!(module.references[0].declared, "lodash");
    }
}
