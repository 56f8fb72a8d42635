//! Verifies the `tracing` instrumentation threaded through the engine is
//! actually observable by a subscriber, which is the only reason this crate
//! carries `tracing-subscriber` as a dev-dependency (SPEC_FULL.md §2):
//! logging is diagnostic-only and never changes an inference result, but it
//! has to be wired up correctly for a host embedding to make use of it.

use std::io;
use std::sync::{Arc, Mutex};

use sl_types::env::{generalise, Environment};
use sl_types::ty::{Type, TypeVar};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct BufWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for BufWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn captured(buf: &BufWriter) -> String {
    String::from_utf8(buf.0.lock().unwrap().clone()).expect("fmt layer writes UTF-8")
}

#[test]
fn generalise_over_a_closed_environment_logs_a_debug_event() {
    let buf = BufWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .with_target(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        // `number` has no free type variables, so generalising it against
        // any environment (even an empty one) stays monomorphic.
        generalise(&Environment::new(), &Type::number());
    });

    let output = captured(&buf);
    assert!(
        output.contains("generalise"),
        "expected a debug event naming the generalise decision, got: {output:?}"
    );
    assert!(
        output.contains("no free quantifiers"),
        "expected the monomorphic-result branch to be logged, got: {output:?}"
    );
}

#[test]
fn generalise_with_free_quantifiers_logs_a_different_event() {
    let buf = BufWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .with_target(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        // `env` is empty, so `T0` is free in `ty` but not in `env`, and
        // generalise quantifies over it.
        generalise(&Environment::new(), &Type::Function(vec![], Box::new(Type::Var(TypeVar(0)))));
    });

    let output = captured(&buf);
    assert!(
        output.contains("quantifying over free variables"),
        "expected the quantifying branch to be logged, got: {output:?}"
    );
}
