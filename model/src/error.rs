use snafu::Snafu;

/// The `Result` type returned by this library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("The live {} is missing its server-assigned {}", what, field))]
    MissingObjectIdentity { what: String, field: String },
}
