use crate::{
    config::Config,
    error::{Error, Result},
    file_impl::FileWriter,
    log_impl::FileSinkTrait,
    side_channel::SideChannel,
};
use crossfire::{MTx, Rx};
use std::sync::Arc;
use std::thread;

/// Lines queued before the callers start to block.
pub const CHANNEL_SIZE: usize = 1024;

enum Msg {
    /// Each line carries the config it was formatted under.
    Line(String, Arc<Config>),
    Reopen,
    Flush(MTx<()>),
}

/// File sink handing lines to a single background thread.
///
/// The thread drains the queue in submission order, so rotation and writes need no locking
/// between callers. Dropping the sink writes what is queued and joins the thread.
pub(crate) struct AsyncFileSink {
    tx: Option<MTx<Msg>>,
    th: Option<thread::JoinHandle<()>>,
    side: SideChannel,
}

impl AsyncFileSink {
    pub fn new(side: SideChannel) -> Result<Self> {
        let (tx, rx) = crossfire::mpsc::bounded_blocking(CHANNEL_SIZE);
        let writer = FileWriter::new(side.clone());
        let th = thread::Builder::new()
            .name("logbook-writer".to_string())
            .spawn(move || log_writer(writer, rx))?;
        Ok(Self { tx: Some(tx), th: Some(th), side })
    }

    #[inline]
    fn send(&self, msg: Msg) -> bool {
        if let Some(tx) = self.tx.as_ref() {
            if tx.send(msg).is_ok() {
                return true;
            }
        }
        false
    }
}

impl FileSinkTrait for AsyncFileSink {
    #[inline]
    fn write(&self, line: String, config: &Arc<Config>) {
        if !self.send(Msg::Line(line, config.clone())) {
            self.side.report(&format!("{}, message dropped", Error::ChannelClosed));
        }
    }

    fn reopen(&self) {
        let _ = self.send(Msg::Reopen);
    }

    /// Block until every line queued before this call is written.
    fn flush(&self) {
        let (done_tx, done_rx) = crossfire::mpsc::bounded_blocking(1);
        if self.send(Msg::Flush(done_tx)) {
            let _ = done_rx.recv();
        }
    }
}

impl Drop for AsyncFileSink {
    fn drop(&mut self) {
        // closing the channel lets the writer drain and exit
        self.tx.take();
        if let Some(th) = self.th.take() {
            let _ = th.join();
        }
    }
}

fn log_writer(mut writer: FileWriter, rx: Rx<Msg>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            Msg::Line(line, config) => writer.write_line(&line, &config),
            Msg::Reopen => writer.reopen(),
            Msg::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
