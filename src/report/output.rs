//! Report output sinks: a single-consumer queue (ordered, written by one thread) or direct writes.

use crossbeam_channel::{Sender, unbounded};
use std::io::Write;
use std::thread::{self, JoinHandle};

/// Ordered output channel. Producers enqueue text; one consumer thread writes and flushes it
/// strictly in enqueue order.
pub struct OutputQueue {
    tx: Option<Sender<String>>,
    handle: Option<JoinHandle<()>>,
}

impl OutputQueue {
    pub fn spawn<W>(mut writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = unbounded::<String>();
        let handle = thread::spawn(move || {
            for text in rx {
                if let Err(e) = writer
                    .write_all(text.as_bytes())
                    .and_then(|_| writer.flush())
                {
                    log::warn!("Could not write report output: {}", e);
                }
            }
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn write(&self, text: String) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(text);
        }
    }

    /// Drain everything queued so far and stop the consumer. Later writes are dropped.
    pub fn close(&mut self) {
        drop(self.tx.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::warn!("report output thread panicked");
        }
    }
}

impl Drop for OutputQueue {
    fn drop(&mut self) {
        self.close();
    }
}

/// Where a reporter's text goes.
pub enum Output {
    Queued(OutputQueue),
    Direct(Box<dyn Write + Send>),
    /// Silent reporters never write.
    Null,
}

impl Output {
    pub fn write(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        match self {
            Output::Queued(queue) => queue.write(text),
            Output::Direct(writer) => {
                if let Err(e) = writer
                    .write_all(text.as_bytes())
                    .and_then(|_| writer.flush())
                {
                    log::warn!("Could not write report output: {}", e);
                }
            }
            Output::Null => {}
        }
    }

    pub fn close(&mut self) {
        match self {
            Output::Queued(queue) => queue.close(),
            Output::Direct(writer) => {
                let _ = writer.flush();
            }
            Output::Null => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_queue_preserves_order() {
        let buf = SharedBuf::default();
        let mut queue = OutputQueue::spawn(buf.clone());
        for i in 0..500 {
            queue.write(format!("{i},"));
        }
        queue.close();
        let expected: String = (0..500).map(|i| format!("{i},")).collect();
        assert_eq!(String::from_utf8(buf.0.lock().unwrap().clone()).unwrap(), expected);
    }

    #[test]
    fn test_writes_after_close_are_dropped() {
        let buf = SharedBuf::default();
        let mut queue = OutputQueue::spawn(buf.clone());
        queue.write("a".into());
        queue.close();
        queue.write("b".into());
        queue.close();
        assert_eq!(buf.0.lock().unwrap().as_slice(), b"a");
    }

    #[test]
    fn test_direct_output_is_synchronous() {
        let buf = SharedBuf::default();
        let mut out = Output::Direct(Box::new(buf.clone()));
        out.write("row\n".into());
        assert_eq!(buf.0.lock().unwrap().as_slice(), b"row\n");
    }
}
