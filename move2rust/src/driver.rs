use codespan_reporting::diagnostic::{Diagnostic, Severity};
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice, WriteColor};
use std::cell::RefCell;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use crate::files::{FileId, Files};
use crate::pass::{HoistScope, Options, Pipeline};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    InputNotFound,
    TransformFailed,
    WriteFailed,
    /// The command line could not be parsed.
    UsageError,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::InputNotFound => 1,
            Status::TransformFailed => 2,
            Status::WriteFailed => 3,
            Status::UsageError => 4,
        }
    }
}

/// Where a translation is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Path(PathBuf),
}

/// The default output path for an input file: the extension is replaced with
/// `rs`, and the first directory named `move` with one named `rust`.
///
/// ```
/// use std::path::Path;
/// use move2rust::driver::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("move/sources/hero.move")),
///     Path::new("rust/sources/hero.rs"),
/// );
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut components: Vec<_> = input.components().collect();
    let directories = components.len().saturating_sub(1);

    if let Some(component) = (components.iter_mut())
        .take(directories)
        .find(|component| component.as_os_str() == "move")
    {
        *component = Component::Normal("rust".as_ref());
    }

    let mut output: PathBuf = components.iter().collect();
    output.set_extension("rs");
    output
}

fn color_choice(stream: atty::Stream) -> ColorChoice {
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub struct Driver {
    files: Files<String, String>,
    options: Options,

    allow_partial: bool,
    codespan_config: codespan_reporting::term::Config,
    diagnostic_writer: RefCell<Box<dyn WriteColor>>,
    emit_writer: RefCell<Box<dyn WriteColor>>,
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

impl Driver {
    pub fn new() -> Driver {
        Driver {
            files: Files::new(),
            options: Options::default(),

            allow_partial: false,
            codespan_config: codespan_reporting::term::Config::default(),
            diagnostic_writer: RefCell::new(Box::new(BufferedStandardStream::stderr(
                color_choice(atty::Stream::Stderr),
            ))),
            emit_writer: RefCell::new(Box::new(BufferedStandardStream::stdout(color_choice(
                atty::Stream::Stdout,
            )))),
        }
    }

    /// Setup a global panic hook
    pub fn install_panic_hook(&self) {
        // Use the currently set codespan configuration
        let term_config = self.codespan_config.clone();
        // Fetch the default hook (which prints the panic message and an optional backtrace)
        let default_hook = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |info| {
            let location = info.location();
            let message = if let Some(message) = info.payload().downcast_ref::<String>() {
                message.as_str()
            } else if let Some(message) = info.payload().downcast_ref::<&str>() {
                message
            } else {
                "unknown panic type"
            };

            let diagnostic = Diagnostic::bug()
                .with_message(format!("translator panicked at '{message}'"))
                .with_notes(vec![
                    match location {
                        Some(location) => format!("panicked at: {location}"),
                        None => "panicked at: unknown location".to_owned(),
                    },
                    "please file a bug report, including the input that caused this".to_owned(),
                ]);

            let mut writer = BufferedStandardStream::stderr(color_choice(atty::Stream::Stderr));
            let dummy_files = Files::<String, String>::new();

            default_hook(info);
            eprintln!();
            // Nothing more can be done if the diagnostic cannot be written.
            let _ = codespan_reporting::term::emit(
                &mut writer,
                &term_config,
                &dummy_files,
                &diagnostic,
            );
            let _ = writer.flush();
        }));
    }

    /// Set to true if translations should be written even when some rewrite
    /// rules failed
    pub fn set_allow_partial(&mut self, allow_partial: bool) {
        self.allow_partial = allow_partial;
    }

    /// Set where nested declarations are hoisted to
    pub fn set_hoist_scope(&mut self, hoist_scope: HoistScope) {
        self.options.hoist_scope = hoist_scope;
    }

    /// Set the writer to use when rendering diagnostics
    pub fn set_diagnostic_writer(&mut self, stream: impl 'static + WriteColor) {
        self.diagnostic_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Set the writer to use when emitting translations to [`Destination::Stdout`]
    pub fn set_emit_writer(&mut self, stream: impl 'static + WriteColor) {
        self.emit_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Load a source string into the file database.
    pub fn load_source_string(&mut self, name: String, source: String) -> FileId {
        self.files.add(name, source)
    }

    /// Load a source file into the file database using a reader.
    pub fn load_source(&mut self, name: String, mut reader: impl Read) -> Option<FileId> {
        let mut source = String::new();
        match reader.read_to_string(&mut source) {
            Ok(_) => Some(self.load_source_string(name, source)),
            Err(error) => {
                self.emit_read_diagnostic(name, error);
                None
            }
        }
    }

    /// Load a source file into the file database from the given path.
    pub fn load_source_path(&mut self, path: &Path) -> Option<FileId> {
        match std::fs::File::open(path) {
            Ok(file) => self.load_source(path.display().to_string(), file),
            Err(error) => {
                self.emit_read_diagnostic(path.display(), error);
                None
            }
        }
    }

    pub fn translate_and_emit(&mut self, file_id: FileId, destination: &Destination) -> Status {
        let name = match self.files.name(file_id) {
            Ok(name) => name.clone(),
            Err(error) => {
                self.emit_diagnostic(Diagnostic::bug().with_message(error.to_string()));
                return Status::TransformFailed;
            }
        };
        log::info!("translating `{name}`");

        let pipeline = Pipeline::new(&self.options);
        let result = match self.files.source(file_id) {
            Ok(source) => pipeline.translate(source),
            Err(error) => {
                self.emit_diagnostic(Diagnostic::bug().with_message(error.to_string()));
                return Status::TransformFailed;
            }
        };

        let translation = match result {
            Ok(translation) => translation,
            Err(error) => {
                let snapshot_name = format!("{name} (before {})", error.stage);
                let snapshot_id = self.files.add(snapshot_name, error.snapshot.to_text());
                self.emit_diagnostic(error.to_diagnostic(snapshot_id));
                return Status::TransformFailed;
            }
        };

        if translation.is_partial() {
            let severity = if self.allow_partial {
                Severity::Warning
            } else {
                Severity::Error
            };
            for failure in translation.failures() {
                self.emit_diagnostic(failure.to_diagnostic(severity));
            }
            if !self.allow_partial {
                self.emit_diagnostic(
                    Diagnostic::note()
                        .with_message("no output was written")
                        .with_notes(vec![
                            "use `--allow-partial` to write the partial translation".to_owned()
                        ]),
                );
                return Status::TransformFailed;
            }
        }

        self.emit_translation(&translation.into_text(), destination)
    }

    fn emit_translation(&self, text: &str, destination: &Destination) -> Status {
        match destination {
            Destination::Stdout => {
                let mut emit_writer = self.emit_writer.borrow_mut();
                match emit_writer
                    .write_all(text.as_bytes())
                    .and_then(|()| emit_writer.flush())
                {
                    Ok(()) => Status::Ok,
                    Err(error) => {
                        self.emit_write_diagnostic("<stdout>", error);
                        Status::WriteFailed
                    }
                }
            }
            Destination::Path(path) => match write_file(path, text) {
                Ok(()) => {
                    log::info!("wrote {} bytes to `{}`", text.len(), path.display());
                    self.emit_diagnostic(Diagnostic::note().with_message(format!(
                        "translation written to `{}`",
                        path.display(),
                    )));
                    Status::Ok
                }
                Err(error) => {
                    self.emit_write_diagnostic(path.display(), error);
                    Status::WriteFailed
                }
            },
        }
    }

    fn emit_diagnostic(&self, diagnostic: Diagnostic<FileId>) {
        let mut writer = self.diagnostic_writer.borrow_mut();
        let config = &self.codespan_config;

        // Diagnostics are best effort once stderr itself is failing.
        let _ = codespan_reporting::term::emit(&mut *writer, config, &self.files, &diagnostic);
        let _ = writer.flush();
    }

    fn emit_read_diagnostic(&self, name: impl std::fmt::Display, error: std::io::Error) {
        let diagnostic =
            Diagnostic::error().with_message(format!("couldn't read `{name}`: {error}"));
        self.emit_diagnostic(diagnostic);
    }

    fn emit_write_diagnostic(&self, name: impl std::fmt::Display, error: std::io::Error) {
        let diagnostic =
            Diagnostic::error().with_message(format!("couldn't write `{name}`: {error}"));
        self.emit_diagnostic(diagnostic);
    }
}

fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}
