//! # Annotate Gallery
//!
//! A local browser for image datasets with sidecar captions. Every image
//! `name.ext` is paired with `name.txt` beside it; the server shows a
//! thumbnail grid, lets you edit captions, delete image/caption pairs, and
//! keep a starred list.
//!
//! # Request Flow
//!
//! ```text
//! browser ──► server (axum) ──► scan        walk folder, create missing sidecars
//!                           ├─► imaging     decode, fit, JPEG thumbnail
//!                           ├─► annotation  read/write one sidecar
//!                           ├─► tags        count tags, batch add/remove
//!                           └─► starred     JSON array on disk
//! ```
//!
//! The filesystem is the source of truth. Scans are never cached, and the
//! starred file is re-read on every request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`server`] | Router, handlers, error mapping, caching headers, the HTML page |
//! | [`scan`] | Recursive folder walk pairing images with sidecars |
//! | [`annotation`] | Read and write sidecar text under the configured decode policy |
//! | [`starred`] | Mutex-guarded starred list persisted as JSON |
//! | [`tags`] | Comma-separated tags: counting, batch add and remove |
//! | [`imaging`] | Pure-Rust thumbnailing behind the [`imaging::ImageBackend`] trait |
//! | [`paths`] | Separator normalisation, extension and MIME classification, request path resolution |
//! | [`config`] | Profile presets, TOML overlay, validation |
//! | [`logging`] | `tracing` subscriber for stderr and a rolling log file |
//! | [`output`] | Terminal formatting for the `scan` command |
//!
//! # Design Decisions
//!
//! ## Trusted, Local Use
//!
//! Request paths are opened as given (relative ones against the working
//! directory). There is no authentication and no sandbox: run it on your
//! own machine, against your own files.
//!
//! ## Pure-Rust Imaging
//!
//! Thumbnails use the `image` crate with Lanczos3 resampling and its JPEG
//! encoder. No system libraries are required.
//!
//! ## Maud For The Page
//!
//! The single HTML page is rendered with [Maud](https://maud.lambda.xyz/) and
//! embeds its stylesheet; the script is compiled into the binary and served
//! from `/static/app.js`.

pub mod annotation;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod paths;
pub mod scan;
pub mod server;
pub mod starred;
pub mod tags;
