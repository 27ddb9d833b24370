use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not prepare the gallery")]
    Gallery,
    #[display("{_0} file(s) could not be organized")]
    Failed(#[error(not(source))] usize),
}
