//! Integration tests for the print form pipeline
//!
//! These tests write real configuration files and document packages to a
//! temporary directory and run the whole conversion.

use print_form::{PrintFormError, PrintFormMaker};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::{tempdir, TempDir};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:r><w:t>Dear [#client#],</w:t></w:r></w:p>
<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t>##M##Optional clause</w:t></w:r></w:p>
<w:p><w:r><w:t>Regards</w:t></w:r></w:p>
</w:body>
</w:document>"#;

struct Fixture {
    dir: TempDir,
    work: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
            work: tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_docx(&self, name: &str, document_xml: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        zip.finish().unwrap();
    }

    fn write_config(&self, text: &str) -> std::path::PathBuf {
        let path = self.path().join("print-form.hjson");
        std::fs::write(&path, text).unwrap();
        path
    }

    fn maker(&self) -> PrintFormMaker {
        PrintFormMaker::with_work_root(self.work.path())
    }

    fn work_is_empty(&self) -> bool {
        std::fs::read_dir(self.work.path()).unwrap().next().is_none()
    }
}

fn read_part(archive: &Path, part: &str) -> String {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut content = String::new();
    zip.by_name(part).unwrap().read_to_string(&mut content).unwrap();
    content
}

#[test]
fn test_mark_block_end_to_end() {
    let fx = Fixture::new();
    fx.write_docx(
        "contract.docx",
        "<w:body><w:p><w:t>a</w:t></w:p><w:p><w:t>##M##b</w:t></w:p></w:body>",
    );
    let config = fx.write_config(
        r#"{
          docxFiles: ["contract.docx"]
          sections: [
            {
              files: ["word/document.xml"]
              blocks: [ { mark: "M", tag: "w:p", before: "<ins>", after: "</ins>" } ]
            }
          ]
        }"#,
    );

    let report = fx.maker().make_print_form(&config).unwrap();

    let output = fx.path().join("contract_PF.docx");
    assert_eq!(report.outputs, vec![output.clone()]);
    assert_eq!(
        read_part(&output, "word/document.xml"),
        "<w:body><w:p><w:t>a</w:t></w:p><ins><w:p><w:t>b</w:t></w:p></ins></w:body>"
    );
    assert_eq!(read_part(&output, "word/styles.xml"), "<w:styles/>");
    assert!(fx.path().join("contract.docx").exists());
    assert!(fx.work_is_empty());
}

#[test]
fn test_full_section_on_realistic_document() {
    let fx = Fixture::new();
    fx.write_docx("forms/letter.docx", DOCUMENT_XML);
    let config = fx.write_config(
        r#"
        # one section, every stage
        {
          docxFiles: ["forms/letter.docx"]
          sections: [
            {
              files: ["word/document.xml"]
              vars: { client: "Client.FullName" }
              blocks: [
                { mark: "M", tag: "w:p", before: "<% if (Clause) { %>", after: "<% } %>" }
                { skip: true, var: "client", tag: "w:p", before: "never", after: "never" }
              ]
              replace: [
                { re: "<w:jc w:val=\"left\"/>", newText: "" }
              ]
            }
          ]
        }
        "#,
    );

    fx.maker().make_print_form(&config).unwrap();

    let xml = read_part(&fx.path().join("forms/letter_PF.docx"), "word/document.xml");
    assert!(xml.contains("Dear <%=XmlAttrEncode(Client.FullName)%>,"));
    assert!(xml.contains(
        "<% if (Clause) { %><w:p><w:pPr></w:pPr><w:r><w:t>Optional clause</w:t></w:r></w:p><% } %>"
    ));
    assert!(!xml.contains("never"));
    assert!(!xml.contains("##"));
    assert!(xml.contains("<w:p><w:r><w:t>Regards</w:t></w:r></w:p>"));
}

#[test]
fn test_missing_document_stops_run() {
    let fx = Fixture::new();
    fx.write_docx("first.docx", "<w:p>##M##</w:p>");
    fx.write_docx("third.docx", "<w:p>##M##</w:p>");
    let config = fx.write_config(
        r#"{
          docxFiles: ["first.docx", "second.docx", "third.docx"]
          sections: [ { files: ["word/document.xml"] } ]
        }"#,
    );

    let result = fx.maker().make_print_form(&config);

    match result {
        Err(PrintFormError::SourceDocumentNotFound(name)) => assert_eq!(name, "second.docx"),
        other => panic!("Expected SourceDocumentNotFound, got {:?}", other),
    }
    assert!(fx.path().join("first_PF.docx").exists());
    assert_eq!(read_part(&fx.path().join("first_PF.docx"), "word/document.xml"), "<w:p></w:p>");
    assert!(!fx.path().join("second_PF.docx").exists());
    assert!(!fx.path().join("third_PF.docx").exists());
    assert!(fx.work_is_empty());
}

#[test]
fn test_existing_print_form_is_overwritten() {
    let fx = Fixture::new();
    fx.write_docx("a.docx", "<w:p>[#n#]</w:p>");
    std::fs::write(fx.path().join("a_PF.docx"), "old output").unwrap();
    let config = fx.write_config(
        r#"{
          docxFiles: ["a.docx"]
          sections: [
            {
              files: ["word/document.xml"]
              vars: {
                n: 7
              }
            }
          ]
        }"#,
    );

    fx.maker().make_print_form(&config).unwrap();

    assert_eq!(
        read_part(&fx.path().join("a_PF.docx"), "word/document.xml"),
        "<w:p><%=XmlAttrEncode(7)%></w:p>"
    );
}

#[test]
fn test_sections_are_cumulative() {
    let fx = Fixture::new();
    fx.write_docx("a.docx", "<w:p>x</w:p>");
    let config = fx.write_config(
        r#"{
          docxFiles: ["a.docx"]
          sections: [
            { files: ["word/document.xml"], replace: [ { re: "x", newText: "[#v#]" } ] }
            { files: ["word/document.xml"], vars: { v: "Value" } }
          ]
        }"#,
    );

    fx.maker().make_print_form(&config).unwrap();

    assert_eq!(
        read_part(&fx.path().join("a_PF.docx"), "word/document.xml"),
        "<w:p><%=XmlAttrEncode(Value)%></w:p>"
    );
}

#[test]
fn test_malformed_config() {
    let fx = Fixture::new();
    let config = fx.write_config("{ docxFiles: [\"a.docx\"], sections: [ { vars: {} } ] }");

    let result = fx.maker().make_print_form(&config);
    assert!(matches!(result, Err(PrintFormError::ConfigParse(_))));
}

#[test]
fn test_invalid_replace_pattern() {
    let fx = Fixture::new();
    fx.write_docx("a.docx", "<w:p/>");
    let config = fx.write_config(
        r#"{ docxFiles: ["a.docx"], sections: [ { files: ["word/document.xml"], replace: [ { re: "(", newText: "" } ] } ] }"#,
    );

    let result = fx.maker().make_print_form(&config);
    assert!(matches!(result, Err(PrintFormError::InvalidPattern { .. })));
    assert!(!fx.path().join("a_PF.docx").exists());
}
