//! Scoped ownership of a symbol sink for one rewrite.

use crate::{emit::SymbolSink, Result};

/// Holds a sink for the duration of one rewrite and guarantees it is released.
///
/// [`SinkSession::finish`] closes the sink. A session dropped without finishing, because an
/// error was propagated with `?` or a panic unwound through it, aborts the sink instead.
pub struct SinkSession<S: SymbolSink> {
    sink: Option<S>,
}

impl<S: SymbolSink> SinkSession<S> {
    /// Take ownership of `sink`.
    pub fn new(sink: S) -> Self {
        SinkSession { sink: Some(sink) }
    }

    /// The sink, for issuing protocol calls.
    ///
    /// # Errors
    /// Returns [`crate::Error::SinkFailure`] if the session has already been finished.
    pub fn sink(&mut self) -> Result<&mut S> {
        self.sink
            .as_mut()
            .ok_or_else(|| sink_error!("session", "sink already released"))
    }

    /// Close the sink and hand it back.
    ///
    /// # Errors
    /// Returns the error of [`SymbolSink::close`]; the sink has then been aborted.
    pub fn finish(mut self) -> Result<S> {
        let mut sink = self
            .sink
            .take()
            .ok_or_else(|| sink_error!("session", "sink already released"))?;

        match sink.close() {
            Ok(()) => Ok(sink),
            Err(error) => {
                sink.abort();
                Err(error)
            }
        }
    }
}

impl<S: SymbolSink> Drop for SinkSession<S> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            log::warn!("Symbol sink released without completing; aborting partial store");
            sink.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        emit::{RecordingSink, SinkCall},
        token::Token,
        Error,
    };

    #[test]
    fn test_finish_closes() {
        let mut session = SinkSession::new(RecordingSink::new());
        session.sink().unwrap().open_method(Token(0x06000001)).unwrap();
        session.sink().unwrap().open_scope(0).unwrap();
        session.sink().unwrap().close_scope(1).unwrap();
        session.sink().unwrap().close_method().unwrap();

        let sink = session.finish().unwrap();
        assert!(sink.is_closed());
        assert!(!sink.is_aborted());
        assert_eq!(sink.calls().last(), Some(&SinkCall::Close));
    }

    #[test]
    fn test_drop_aborts() {
        let mut sink = RecordingSink::new();
        {
            let mut session = SinkSession::new(&mut sink);
            session.sink().unwrap().open_method(Token(0x06000001)).unwrap();
        }
        assert!(sink.is_aborted());
        assert_eq!(sink.calls().last(), Some(&SinkCall::Aborted));
    }

    #[test]
    fn test_failed_close_aborts() {
        let mut sink = RecordingSink::new();
        let mut session = SinkSession::new(&mut sink);
        session.sink().unwrap().open_method(Token(0x06000001)).unwrap();
        assert!(matches!(
            session.finish(),
            Err(Error::SinkFailure {
                operation: "close",
                ..
            })
        ));
        assert!(sink.is_aborted());
    }
}
