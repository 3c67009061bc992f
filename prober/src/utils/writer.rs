use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Stderr, Stdout, Write};
use std::string::FromUtf8Error;

pub struct Writer {
    buffer: WriteBuffer,
    err: WriteBuffer,
}

impl Writer {
    pub fn new(buffer: WriteBuffer) -> Self {
        Self {
            buffer,
            err: WriteBuffer::Stderr(std::io::stderr()),
        }
    }

    pub fn new_with_err(buffer: WriteBuffer, err: WriteBuffer) -> Self {
        Self { buffer, err }
    }

    pub fn write_err(&mut self, s: String) -> std::io::Result<()> {
        writeln!(self.err, "{s}")
    }

    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        self.buffer.into_string()
    }

    pub fn err_to_stripped(self) -> Result<String, FromUtf8Error> {
        self.err.into_stripped()
    }

    /// Output with ANSI colour codes removed.
    pub fn stripped(self) -> Result<String, FromUtf8Error> {
        self.buffer.into_stripped()
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.buffer.flush()
    }
}

pub enum WriteBuffer {
    Stdout(Stdout),
    Stderr(Stderr),
    Vec(Vec<u8>),
    File(File),
}

impl WriteBuffer {
    fn into_bytes(self) -> Vec<u8> {
        match self {
            WriteBuffer::Stdout(..) | WriteBuffer::Stderr(..) => vec![],
            WriteBuffer::Vec(vec) => vec,
            WriteBuffer::File(mut file) => {
                let mut data = vec![];
                if file.seek(SeekFrom::Start(0)).is_ok() {
                    let _ = file.read_to_end(&mut data);
                }
                data
            }
        }
    }

    fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.into_bytes())
    }

    fn into_stripped(self) -> Result<String, FromUtf8Error> {
        let bytes = self.into_bytes();
        let stripped = strip_ansi_escapes::strip(&bytes).unwrap_or(bytes);
        String::from_utf8(stripped)
    }
}

impl Write for WriteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.write(buf),
            WriteBuffer::Stderr(stderr) => stderr.write(buf),
            WriteBuffer::Vec(vec) => vec.write(buf),
            WriteBuffer::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.flush(),
            WriteBuffer::Stderr(stderr) => stderr.flush(),
            WriteBuffer::Vec(vec) => vec.flush(),
            WriteBuffer::File(file) => file.flush(),
        }
    }
}
