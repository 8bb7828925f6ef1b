use colored::Colorize;
use std::io::{self, Write};

/// Single line `label: done/total` counter redrawn in place on stdout.
#[derive(Debug)]
pub struct Progress {
    label: &'static str,
    done: usize,
    total: Option<usize>,
}

impl Progress {
    pub fn new(label: &'static str, total: Option<usize>) -> Progress {
        let progress = Progress {
            label,
            done: 0,
            total,
        };
        progress.draw();
        progress
    }

    #[inline]
    pub const fn done(&self) -> usize {
        self.done
    }

    pub fn advance(&mut self, by: usize) {
        self.done += by;
        self.draw();
    }

    pub fn finish(self) {
        self.draw();
        println!();
    }

    fn draw(&self) {
        let count = match self.total {
            Some(total) => format!("{}/{}", self.done, total),
            None => self.done.to_string(),
        };
        print!("\r{} {}", format!("{}:", self.label).blue(), count.green());
        // cosmetic only, a closed stdout is not worth failing a pass over
        let _ = io::stdout().flush();
    }
}
