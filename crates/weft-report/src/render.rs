//! Report renderings: terminal text ([`fmt::Display`]), Markdown, JSON, and
//! a standalone HTML document. All four read the same [`Report`] value;
//! nothing is recomputed per format.

use std::fmt;
use std::fmt::Write as _;

use weft_core::WeftError;

use crate::aggregate::Report;

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference Map Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Generated: {}\n", self.generated_at.to_rfc3339())?;

        let s = &self.summary;
        writeln!(f, "Summary")?;
        writeln!(f, "{:-<72}", "")?;
        writeln!(f, "  HTML pages:     {}", s.html.total_pages)?;
        writeln!(
            f,
            "  CSS imports:    {} ({} missing)",
            s.css.total_imports, s.css.missing_files
        )?;
        writeln!(
            f,
            "  JS modules:     {} ({} imports, {} missing)",
            s.js.total_modules, s.js.total_imports, s.js.missing_files
        )?;
        writeln!(
            f,
            "  Resources:      {} images, {} fonts",
            s.resources.total_images, s.resources.total_fonts
        )?;
        writeln!(
            f,
            "  Design system:  {} tokens, {} patterns, {} themes\n",
            s.design_system.total_tokens,
            s.design_system.total_patterns,
            s.design_system.total_themes
        )?;

        writeln!(f, "Bundles")?;
        writeln!(f, "{:-<72}", "")?;
        for bundle in &self.analysis.css.bundles {
            if bundle.exists {
                writeln!(
                    f,
                    "  \u{2713} {:<40} {:.1} KiB",
                    bundle.path,
                    bundle.size_bytes as f64 / 1024.0
                )?;
            } else {
                writeln!(f, "  \u{2717} {:<40} missing", bundle.path)?;
            }
        }
        writeln!(f)?;

        if !self.recommendations.is_empty() {
            writeln!(f, "Recommendations")?;
            writeln!(f, "{:-<72}", "")?;
            for rec in &self.recommendations {
                writeln!(f, "  [{}] {}: {}", rec.severity, rec.category, rec.title)?;
                writeln!(f, "      {}", rec.description)?;
                for file in &rec.files {
                    writeln!(f, "        {file}")?;
                }
            }
            writeln!(f)?;
        }

        let missing = &self.analysis.html.missing_references;
        if !missing.is_empty() {
            writeln!(f, "Missing page references")?;
            writeln!(f, "{:-<72}", "")?;
            for m in missing {
                writeln!(f, "  {} ({}): {}", m.file, m.kind, m.reference)?;
            }
            writeln!(f)?;
        }

        if !self.common_issues.is_empty() {
            writeln!(f, "Common issues")?;
            writeln!(f, "{:-<72}", "")?;
            for issue in &self.common_issues {
                writeln!(
                    f,
                    "  {}x [{}] {}",
                    issue.occurrences.len(),
                    issue.severity,
                    issue.message
                )?;
            }
            writeln!(f)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "Warnings")?;
            writeln!(f, "{:-<72}", "")?;
            for warning in &self.warnings {
                writeln!(f, "  {warning}")?;
            }
        }

        Ok(())
    }
}

impl Report {
    /// Serialize the structured data document.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::Serialization`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn demo(report: &weft_report::Report) {
    /// let json = report.to_json().unwrap();
    /// assert!(json.contains("\"summary\""));
    /// # }
    /// ```
    pub fn to_json(&self) -> Result<String, WeftError> {
        serde_json::to_string_pretty(self).map_err(WeftError::from)
    }

    /// Render the report as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Reference Map Report\n\n");
        let _ = writeln!(out, "*Generated: {}*\n", self.generated_at.to_rfc3339());

        let s = &self.summary;
        out.push_str("## Summary\n\n");
        out.push_str("| Area | Count | Missing |\n");
        out.push_str("|------|-------|---------|\n");
        let _ = writeln!(out, "| HTML pages | {} | {} |", s.html.total_pages, s.html.missing_references);
        let _ = writeln!(out, "| CSS imports | {} | {} |", s.css.total_imports, s.css.missing_files);
        let _ = writeln!(
            out,
            "| JS modules | {} ({} imports) | {} |",
            s.js.total_modules, s.js.total_imports, s.js.missing_files
        );
        let _ = writeln!(
            out,
            "| Resources | {} images, {} fonts | — |",
            s.resources.total_images, s.resources.total_fonts
        );
        let _ = writeln!(
            out,
            "| Design tokens | {} | — |",
            s.design_system.total_tokens
        );
        out.push('\n');

        out.push_str("## Bundles\n\n");
        out.push_str("| Bundle | Exists | Size |\n");
        out.push_str("|--------|--------|------|\n");
        for bundle in &self.analysis.css.bundles {
            let size = if bundle.exists {
                format!("{:.1} KiB", bundle.size_bytes as f64 / 1024.0)
            } else {
                "-".into()
            };
            let mark = if bundle.exists { "yes" } else { "no" };
            let _ = writeln!(out, "| `{}` | {} | {} |", bundle.path, mark, size);
        }
        out.push('\n');

        if !self.recommendations.is_empty() {
            out.push_str("## Recommendations\n\n");
            for rec in &self.recommendations {
                let _ = writeln!(out, "- **[{}] {}** — {}", rec.severity, rec.title, rec.description);
                for file in &rec.files {
                    let _ = writeln!(out, "  - `{file}`");
                }
            }
            out.push('\n');
        }

        if !self.analysis.html.missing_references.is_empty() {
            out.push_str("## Missing page references\n\n");
            out.push_str("| Page | Type | Reference |\n");
            out.push_str("|------|------|-----------|\n");
            for m in &self.analysis.html.missing_references {
                let _ = writeln!(out, "| `{}` | {} | `{}` |", m.file, m.kind, m.reference);
            }
            out.push('\n');
        }

        if !self.common_issues.is_empty() {
            out.push_str("## Common issues\n\n");
            for issue in &self.common_issues {
                let _ = writeln!(
                    out,
                    "- **{}** `[{}]` {} ({} files)",
                    issue.category,
                    issue.severity,
                    issue.message,
                    issue.occurrences.len()
                );
            }
            out.push('\n');
        }

        if !self.warnings.is_empty() {
            out.push_str("## Warnings\n\n");
            for warning in &self.warnings {
                let _ = writeln!(out, "- {warning}");
            }
        }

        out
    }

    /// Render the standalone HTML human document: summary cards, tables, and
    /// collapsible file lists for manual review.
    pub fn to_html(&self) -> String {
        let s = &self.summary;
        let mut body = String::new();

        body.push_str("<div class=\"summary\">\n");
        for (value, label) in [
            (s.html.total_pages, "HTML pages"),
            (s.css.total_imports, "CSS imports"),
            (s.js.total_modules, "JS modules"),
            (s.resources.total_images, "Images"),
            (s.design_system.total_tokens, "Design tokens"),
        ] {
            let _ = writeln!(
                body,
                "  <div class=\"card\"><div class=\"num\">{value}</div><div>{label}</div></div>"
            );
        }
        body.push_str("</div>\n");

        if !self.recommendations.is_empty() {
            body.push_str("<section><h2>Recommendations</h2>\n");
            for rec in &self.recommendations {
                let _ = writeln!(
                    body,
                    "<div class=\"rec {}\"><strong>{}</strong><br>{}",
                    rec.severity,
                    escape(&rec.title),
                    escape(&rec.description)
                );
                if let Some(action) = &rec.action {
                    let _ = writeln!(body, "<br><code>{}</code>", escape(action));
                }
                if !rec.files.is_empty() {
                    let _ = writeln!(
                        body,
                        "<details><summary>{} file(s)</summary><ul>",
                        rec.files.len()
                    );
                    for file in &rec.files {
                        let _ = writeln!(body, "<li><code>{}</code></li>", escape(file));
                    }
                    body.push_str("</ul></details>\n");
                }
                body.push_str("</div>\n");
            }
            body.push_str("</section>\n");
        }

        body.push_str("<section><h2>Bundles</h2>\n<table><thead><tr><th>Bundle</th><th>Exists</th><th>Size</th></tr></thead><tbody>\n");
        for bundle in &self.analysis.css.bundles {
            let mark = if bundle.exists {
                "<span class=\"ok\">\u{2713}</span>"
            } else {
                "<span class=\"bad\">\u{2717}</span>"
            };
            let size = if bundle.exists {
                format!("{:.1} KiB", bundle.size_bytes as f64 / 1024.0)
            } else {
                "-".into()
            };
            let _ = writeln!(
                body,
                "<tr><td><code>{}</code></td><td>{mark}</td><td>{size}</td></tr>",
                escape(&bundle.path)
            );
        }
        body.push_str("</tbody></table></section>\n");

        body.push_str("<section><h2>Pages</h2>\n");
        let _ = writeln!(
            body,
            "<details><summary>{} page(s)</summary>",
            self.analysis.html.pages.len()
        );
        body.push_str("<table><thead><tr><th>Page</th><th>CSS</th><th>JS</th><th>Images</th><th>Fonts</th></tr></thead><tbody>\n");
        for page in &self.analysis.html.pages {
            let _ = writeln!(
                body,
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&page.path),
                page.css_links,
                page.js_references,
                page.image_references,
                page.font_references
            );
        }
        body.push_str("</tbody></table></details></section>\n");

        body.push_str("<section><h2>JavaScript modules</h2>\n");
        let _ = writeln!(
            body,
            "<details><summary>{} module(s), {} import(s)</summary>",
            s.js.total_modules, s.js.total_imports
        );
        body.push_str("<table><thead><tr><th>Module</th><th>Kind</th><th>Imports</th><th>Exports</th></tr></thead><tbody>\n");
        for module in &self.analysis.js.modules {
            let _ = writeln!(
                body,
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&module.path),
                module.kind,
                module.imports,
                module.exports
            );
        }
        body.push_str("</tbody></table></details></section>\n");

        if !self.analysis.html.missing_references.is_empty() {
            body.push_str("<section><h2>Missing page references</h2>\n<table><thead><tr><th>Page</th><th>Type</th><th>Reference</th></tr></thead><tbody>\n");
            for m in &self.analysis.html.missing_references {
                let _ = writeln!(
                    body,
                    "<tr><td><code>{}</code></td><td>{}</td><td><code>{}</code></td></tr>",
                    escape(&m.file),
                    escape(&m.kind),
                    escape(&m.reference)
                );
            }
            body.push_str("</tbody></table></section>\n");
        }

        if !self.common_issues.is_empty() {
            body.push_str("<section><h2>Common issues</h2>\n");
            for issue in &self.common_issues {
                let _ = writeln!(
                    body,
                    "<div class=\"rec {}\"><strong>{}</strong> — {} files<details><summary>occurrences</summary><ul>",
                    issue.severity,
                    escape(&issue.message),
                    issue.occurrences.len()
                );
                for file in &issue.occurrences {
                    let _ = writeln!(body, "<li><code>{}</code></li>", escape(file));
                }
                body.push_str("</ul></details></div>\n");
            }
            body.push_str("</section>\n");
        }

        body.push_str("<section><h2>Design system</h2>\n");
        let ds = &self.analysis.design_system;
        let _ = writeln!(
            body,
            "<p>{} token(s) in use, {} definition(s), {} pattern(s).</p>",
            ds.tokens_in_use.len(),
            ds.definitions.len(),
            ds.patterns.len()
        );
        if let Some(theme_count) = ds.theme_token_count {
            let _ = writeln!(body, "<p>Theme file defines {theme_count} token group(s).</p>");
        }
        body.push_str("</section>\n");

        if !self.warnings.is_empty() {
            body.push_str("<section><h2>Warnings</h2>\n<ul>");
            for warning in &self.warnings {
                let _ = writeln!(body, "<li>{}</li>", escape(warning));
            }
            body.push_str("</ul></section>\n");
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Reference Map Report</title>
<style>
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
         max-width: 1100px; margin: 0 auto; padding: 20px; color: #222; }}
  header {{ padding: 24px; border-radius: 8px; background: #1d2230; color: #fff; }}
  .summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
              gap: 16px; margin: 24px 0; }}
  .card {{ background: #f6f7f9; border-radius: 8px; padding: 16px; text-align: center; }}
  .card .num {{ font-size: 2em; font-weight: 700; }}
  section {{ margin-bottom: 28px; }}
  table {{ border-collapse: collapse; width: 100%; }}
  th, td {{ text-align: left; padding: 8px; border-bottom: 1px solid #ddd; }}
  code {{ background: #f0f1f3; padding: 1px 5px; border-radius: 3px; font-size: 0.9em; }}
  .ok {{ color: #1a7f37; font-weight: 700; }}
  .bad {{ color: #cf222e; font-weight: 700; }}
  .rec {{ padding: 12px; border-radius: 6px; margin-bottom: 10px; }}
  .rec.critical, .rec.error {{ background: #ffebe9; border-left: 4px solid #cf222e; }}
  .rec.warning {{ background: #fff8c5; border-left: 4px solid #d4a72c; }}
  .rec.optimization {{ background: #ddf4ff; border-left: 4px solid #54aeff; }}
  details > summary {{ cursor: pointer; color: #0969da; }}
</style>
</head>
<body>
<header><h1>Reference Map Report</h1><p>Generated: {generated}</p></header>
{body}</body>
</html>
"#,
            generated = self.generated_at.to_rfc3339(),
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
