/// Boxed error returned by fallible target accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the binding lifecycle hooks.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	#[error("cannot resolve binding target for `{slot}`: {source}")]
	Configuration {
		slot: String,
		#[source]
		source: BoxError,
	},
}

pub type Result<T> = std::result::Result<T, BindError>;
