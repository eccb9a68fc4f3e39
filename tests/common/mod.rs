//! Shared fixture: a small Salesforce DX project on disk.

#![allow(dead_code)]

use lwc_preview::port::PortProbe;
use lwc_preview::{ConfigBuilder, ServerConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const COMPONENT: &str = "force-app/main/default/lwc/helloWorld";

pub const HELLO_WORLD_JS: &str = r#"import { LightningElement } from "lwc";
import greeting from "@salesforce/label/c.greeting";
import logo from "@salesforce/resourceUrl/myImage";

export default class HelloWorld extends LightningElement {
    greeting = greeting;
    logo = logo;
}
"#;

/// Reports every port free so configs are deterministic.
pub struct AllFree;

impl PortProbe for AllFree {
    fn is_in_use(&self, _port: u16) -> bool {
        false
    }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Project with one script component, one style-only component, a label
/// file and a static resource.
pub fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "sfdx-project.json",
        r#"{"packageDirectories":[{"path":"force-app","default":true}]}"#,
    );
    write(root, "force-app/main/default/lwc/helloWorld/helloWorld.js", HELLO_WORLD_JS);
    write(
        root,
        "force-app/main/default/lwc/helloWorld/helloWorld.html",
        "<template><p>{greeting}</p></template>",
    );
    write(
        root,
        "force-app/main/default/lwc/helloWorld/helloWorld.js-meta.xml",
        "<LightningComponentBundle><isExposed>true</isExposed></LightningComponentBundle>",
    );
    write(root, "force-app/main/default/lwc/theme/theme.css", ":host { color: red; }");
    write(
        root,
        "force-app/main/default/lwc/theme/theme.js-meta.xml",
        "<LightningComponentBundle/>",
    );
    write(
        root,
        "force-app/main/default/labels/CustomLabels.labels-meta.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomLabels xmlns="http://soap.sforce.com/2006/04/metadata">
    <labels>
        <fullName>greeting</fullName>
        <language>en_US</language>
        <protected>false</protected>
        <shortDescription>Greeting</shortDescription>
        <value>Hello there</value>
    </labels>
</CustomLabels>"#,
    );
    write(root, "force-app/main/default/staticresources/myImage.png", "png");
    write(
        root,
        "force-app/main/default/staticresources/myImage.resource-meta.xml",
        "<StaticResource><contentType>image/png</contentType></StaticResource>",
    );

    dir
}

pub fn config(project: &Path) -> ServerConfig {
    ConfigBuilder::new(COMPONENT, project)
        .port_probe(AllFree)
        .build()
        .unwrap()
}
