//! The single HTML page served at `/`.
//!
//! Rendered with [maud](https://maud.lambda.xyz/). The page is a shell: the
//! tag panel, image grid, and editor are filled in by `static/app.js`
//! talking to the JSON endpoints.

use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../../static/style.css");
pub const APP_JS: &str = include_str!("../../static/app.js");

pub fn render_index() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme="light" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Annotate Gallery" }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.toolbar {
                    input #folder-path type="text" placeholder="Folder to scan, e.g. /data/photos";
                    button #scan-button type="button" { "Scan" }
                    button #starred-button type="button" { "Starred" }
                    button #theme-button type="button" title="Toggle theme" { "◐" }
                    span #status {}
                }
                main.layout {
                    aside #tag-panel .tags {
                        h2 { "Tags" }
                        div #tag-stats {}
                        div.batch {
                            input #batch-tag type="text" placeholder="Tag to add to every image";
                            select #insert-position {
                                option value="start" { "At start" }
                                option value="end" selected { "At end" }
                            }
                            button #batch-add-button type="button" { "Add to all" }
                        }
                    }
                    section #grid .grid {}
                    aside #editor .editor hidden {
                        img #preview alt="";
                        p #preview-path .path {}
                        textarea #annotation rows="8" {}
                        div.actions {
                            button #save-button type="button" { "Save" }
                            button #star-toggle type="button" { "☆ Star" }
                            button #delete-button .danger type="button" { "Delete" }
                        }
                    }
                }
                script src="/static/app.js" {}
            }
        }
    }
}
