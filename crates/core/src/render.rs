//! Report rendering
//!
//! Renders an assembled [`Bom`] as pretty-printed JSON and as CycloneDX XML,
//! and writes both reports to disk. XML is produced by a small indenting
//! element writer; the document shape is fixed by the schema, the only
//! dynamic parts are text and attribute values, which are escaped here.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::bom::{Bom, Component, ComponentType};
use crate::{CoreError, Result};

/// XML namespace of the targeted CycloneDX schema version.
const XMLNS: &str = "http://cyclonedx.org/schema/bom/1.5";

/// Render the document as pretty-printed JSON.
pub fn render_json(bom: &Bom) -> Result<String> {
    let mut out = serde_json::to_string_pretty(bom)?;
    out.push('\n');
    Ok(out)
}

/// Render the document as CycloneDX XML.
pub fn render_xml(bom: &Bom) -> String {
    let mut w = XmlWriter::new();

    let mut bom_attrs = vec![("xmlns", XMLNS.to_string())];
    if let Some(serial) = &bom.serial_number {
        bom_attrs.push(("serialNumber", serial.clone()));
    }
    bom_attrs.push(("version", bom.version.to_string()));
    w.open_with("bom", &bom_attrs);

    w.open("metadata");
    w.leaf("timestamp", &bom.metadata.timestamp);
    w.open("tools");
    for tool in &bom.metadata.tools {
        w.open("tool");
        w.leaf("name", &tool.name);
        w.leaf("version", &tool.version);
        w.close("tool");
    }
    w.close("tools");
    write_component(&mut w, &bom.metadata.component);
    w.close("metadata");

    w.open("components");
    for component in &bom.components {
        write_component(&mut w, component);
    }
    w.close("components");

    w.open("dependencies");
    for entry in &bom.dependencies {
        if entry.depends_on.is_empty() {
            w.empty_with("dependency", &[("ref", entry.dependency_ref.clone())]);
            continue;
        }
        w.open_with("dependency", &[("ref", entry.dependency_ref.clone())]);
        for target in &entry.depends_on {
            w.empty_with("dependency", &[("ref", target.clone())]);
        }
        w.close("dependency");
    }
    w.close("dependencies");

    w.close("bom");
    w.finish()
}

fn write_component(w: &mut XmlWriter, component: &Component) {
    let kind = match component.component_type {
        ComponentType::Application => "application",
        ComponentType::Library => "library",
    };
    w.open_with(
        "component",
        &[
            ("type", kind.to_string()),
            ("bom-ref", component.bom_ref.clone()),
        ],
    );

    if let Some(group) = &component.group {
        w.leaf("group", group);
    }
    w.leaf("name", &component.name);
    w.leaf("version", &component.version);
    if let Some(description) = &component.description {
        w.leaf("description", description);
    }
    if !component.hashes.is_empty() {
        w.open("hashes");
        for hash in &component.hashes {
            w.leaf_with("hash", &[("alg", hash.alg.clone())], &hash.content);
        }
        w.close("hashes");
    }
    if !component.licenses.is_empty() {
        w.open("licenses");
        for license in &component.licenses {
            w.leaf("expression", &license.expression);
        }
        w.close("licenses");
    }
    if let Some(purl) = &component.purl {
        w.leaf("purl", purl);
    }

    w.close("component");
}

/// Write both reports, creating parent directories as needed.
pub fn write_reports(bom: &Bom, json_path: &Path, xml_path: &Path) -> Result<()> {
    let json = render_json(bom)?;
    let xml = render_xml(bom);

    for (path, content) in [(json_path, json), (xml_path, xml)] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CoreError::ReportWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| CoreError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("wrote report {}", path.display());
    }

    Ok(())
}

/// Minimal indenting XML element writer.
struct XmlWriter {
    buf: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            buf: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push_str("  ");
        }
    }

    fn open(&mut self, tag: &str) {
        self.indent();
        let _ = writeln!(self.buf, "<{tag}>");
        self.depth += 1;
    }

    fn open_with(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        for (key, value) in attrs {
            let _ = write!(self.buf, " {key}=\"{}\"", escape(value));
        }
        self.buf.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        let _ = writeln!(self.buf, "</{tag}>");
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.indent();
        let _ = writeln!(self.buf, "<{tag}>{}</{tag}>", escape(text));
    }

    fn leaf_with(&mut self, tag: &str, attrs: &[(&str, String)], text: &str) {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        for (key, value) in attrs {
            let _ = write!(self.buf, " {key}=\"{}\"", escape(value));
        }
        let _ = writeln!(self.buf, ">{}</{tag}>", escape(text));
    }

    fn empty_with(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        for (key, value) in attrs {
            let _ = write!(self.buf, " {key}=\"{}\"", escape(value));
        }
        self.buf.push_str("/>\n");
    }

    fn finish(self) -> String {
        self.buf
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::{BomMode, assemble};
    use crate::lock::LockFile;
    use crate::manifest::Manifest;
    use crate::settings::Settings;
    use tempfile::TempDir;

    fn sample_bom() -> Bom {
        let manifest = Manifest::parse(
            r#"
[package]
name = "sample <app>"
version = "1.0.0"
license = "MIT"

[dependencies]
serde = "1.0"
"#,
            Path::new("Cargo.toml"),
        )
        .unwrap();
        let lock: LockFile = toml::from_str(
            r#"
version = 4

[[package]]
name = "serde"
version = "1.0.210"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "c8e3592472072e6e22e0a54d5904d9febf8508f65fb8552499a1abc7d1078c3a"
"#,
        )
        .unwrap();
        let settings = Settings {
            include_serial_number: false,
            ..Settings::default()
        };
        assemble(&settings, &manifest, &lock, BomMode::Direct)
    }

    #[test]
    fn test_json_has_schema_fields() {
        let json = render_json(&sample_bom()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["bomFormat"], "CycloneDX");
        assert_eq!(value["specVersion"], "1.5");
        assert_eq!(value["version"], 1);
        assert_eq!(value["metadata"]["component"]["type"], "application");
        assert_eq!(value["components"][0]["purl"], "pkg:cargo/serde@1.0.210");
        assert_eq!(value["dependencies"][0]["dependsOn"][0], "pkg:cargo/serde@1.0.210");
        // Serial number disabled: the key must be absent, not null
        assert!(value.get("serialNumber").is_none());
    }

    #[test]
    fn test_xml_structure_and_escaping() {
        let xml = render_xml(&sample_bom());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<bom xmlns=\"http://cyclonedx.org/schema/bom/1.5\" version=\"1\">"));
        assert!(xml.contains("<name>sample &lt;app&gt;</name>"));
        assert!(xml.contains("<hash alg=\"SHA-256\">"));
        assert!(xml.contains("<expression>MIT</expression>"));
        assert!(xml.contains("<dependency ref=\"pkg:cargo/serde@1.0.210\"/>"));
        assert!(xml.ends_with("</bom>\n"));
    }

    #[test]
    fn test_escape_covers_attribute_characters() {
        assert_eq!(escape(r#"a&b<c>"d'e"#), "a&amp;b&lt;c&gt;&quot;d&apos;e");
    }

    #[test]
    fn test_write_reports_creates_directories() {
        let temp = TempDir::new().unwrap();
        let json_path = temp.path().join("reports/sbom/bom.json");
        let xml_path = temp.path().join("reports/sbom/bom.xml");

        write_reports(&sample_bom(), &json_path, &xml_path).unwrap();

        assert!(json_path.exists());
        let xml = fs::read_to_string(&xml_path).unwrap();
        assert!(xml.contains("</bom>"));
    }
}
