use std::fs;
use std::path::Path;

// A small package with two interfaces: `Store` exercises cross-package
// imports and multi-result methods, `Closer` is the minimal case.
#[allow(dead_code)]
pub const STORE_DESCRIPTOR: &str = r#"{
    "package": {"path": "example.com/pkg/db", "name": "db"},
    "interfaces": [
        {
            "name": "Store",
            "methods": [
                {
                    "name": "Do",
                    "params": [
                        {
                            "name": "ctx",
                            "type": {
                                "kind": "named",
                                "package": {"path": "context", "name": "context"},
                                "name": "Context"
                            }
                        },
                        {
                            "name": "req",
                            "type": {
                                "kind": "pointer",
                                "elem": {
                                    "kind": "named",
                                    "package": {"path": "example.com/pkg/db", "name": "db"},
                                    "name": "Request"
                                }
                            }
                        }
                    ],
                    "results": [
                        {
                            "type": {
                                "kind": "pointer",
                                "elem": {
                                    "kind": "named",
                                    "package": {"path": "example.com/pkg/db", "name": "db"},
                                    "name": "Response"
                                }
                            }
                        },
                        {"type": {"kind": "named", "name": "error"}}
                    ]
                }
            ]
        },
        {
            "name": "Closer",
            "methods": [
                {
                    "name": "Close",
                    "results": [{"type": {"kind": "named", "name": "error"}}]
                }
            ]
        }
    ]
}"#;

#[allow(dead_code)]
pub fn write_descriptor(dir: &Path, contents: &str) {
    let path = dir.join("typegraph.json");
    fs::write(&path, contents)
        .unwrap_or_else(|err| panic!("write descriptor {}: {err}", path.display()));
}
