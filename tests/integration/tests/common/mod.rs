//! Shared fixture: a minimal but complete skiff client tree.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes a self-contained client asset tree plus a matching manifest
/// below `root`. The tree exercises every asset category: styles,
/// scripts with both placeholders, the three pages, a misc asset, svg
/// icons, client templates, editor themes, modes, and two lib bundles.
pub fn scaffold(root: &Path) {
    let write = |rel: &str, content: &str| {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    };

    write(
        "assets.json",
        r#"{
            "styles": ["client/app.css"],
            "scripts": ["client/app.js"],
            "pages": {
                "base": "client/html/base.html",
                "main": "client/html/main.html",
                "auth": "client/html/auth.html"
            },
            "misc": ["client/logo.svg"],
            "libs": [
                {"name": "editor.js", "sources": [
                    "client/vendor/editor/edit1.js",
                    "client/vendor/editor/edit2.js"
                ]},
                {"name": "editor.css", "sources": "client/vendor/editor/editor.css"}
            ]
        }"#,
    );

    write("client/app.css", "html {\n  color: #333;\n}\n");
    write(
        "client/app.js",
        concat!(
            "var skiff = {};\n",
            "skiff.esc = function (s) { return s; };\n",
            "/* {{ sprites }} */\n",
            "/* {{ templates }} */\n",
            "skiff.init = true;\n",
        ),
    );
    write(
        "client/html/base.html",
        "<!DOCTYPE html><html lang=\"en\"><head><title>skiff</title></head>\
         <body><!-- page --></body></html>",
    );
    write(
        "client/html/main.html",
        "<main><!-- icon:up --> files</main>",
    );
    write("client/html/auth.html", "<form>login</form>");
    write("client/logo.svg", "<svg><circle r=\"4\"/></svg>");

    write("client/svg/up.svg", "<svg viewBox=\"0 0 8 8\"><path d=\"M0 0h8\"/></svg>");
    write("client/templates/row.html", "<tr>{{name}}</tr>");

    write("client/vendor/editor/edit1.js", "var editor = 1");
    write("client/vendor/editor/edit2.js", "var addon = 2");
    write("client/vendor/editor/editor.css", ".editor {\n  margin: 0;\n}\n");
    write(
        "client/vendor/editor/modes.json",
        r#"[
            {"name": "Markdown", "mode": "markdown"},
            {"name": "Plain Text", "mode": "none"}
        ]"#,
    );
    write(
        "client/vendor/editor/mode/markdown/markdown.js",
        "registerMode(\"markdown\");",
    );
    write("client/vendor/editor/theme/night.css", ".night {\n  color: white;\n}\n");
    write("client/editor-theme.css", ".skiff {\n  color: black;\n}\n");
}

/// Path of the fixture manifest below `root`.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join("assets.json")
}
