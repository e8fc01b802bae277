//! Job Panel
//!
//! Lists the commands being run, one status line each with the latest
//! output underneath. This is what the mask covers while it is up.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::jobs::{Job, JobSet, JobStatus};
use crate::theme::{ACCENT_MAGENTA, DIM_GRAY, ERROR_RED, RUNNING_BLUE, SUCCESS_GREEN};

/// Job list widget
pub struct JobPanel<'a> {
    jobs: &'a JobSet,
}

impl<'a> JobPanel<'a> {
    pub fn new(jobs: &'a JobSet) -> Self {
        Self { jobs }
    }

    fn header(&self) -> String {
        let done = self.jobs.len() - self.jobs.outstanding();
        format!(" memeload  {done}/{} done ", self.jobs.len())
    }
}

fn status_color(status: JobStatus) -> Color {
    match status {
        JobStatus::Running => RUNNING_BLUE,
        JobStatus::Succeeded => SUCCESS_GREEN,
        JobStatus::Failed(_) | JobStatus::Aborted => ERROR_RED,
    }
}

fn status_line(job: &Job) -> String {
    let mut line = format!("{} {}", job.status.icon(), job.command);
    if let JobStatus::Failed(code) = job.status {
        line.push_str(&format!("  (exit {code})"));
    }
    if let Some(elapsed) = job.elapsed() {
        line.push_str(&format!("  {:.1}s", elapsed.as_secs_f64()));
    }
    line
}

impl Widget for JobPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        buf.set_stringn(
            area.x,
            area.y,
            self.header(),
            width,
            Style::default().fg(ACCENT_MAGENTA),
        );

        let mut y = area.y + 1;
        let bottom = area.y + area.height;
        for job in self.jobs.jobs() {
            if y >= bottom {
                break;
            }
            buf.set_stringn(
                area.x + 1,
                y,
                status_line(job),
                width - 1,
                Style::default().fg(status_color(job.status)),
            );
            y += 1;

            if let Some(last) = &job.last_line {
                if y >= bottom {
                    break;
                }
                buf.set_stringn(
                    area.x + 4,
                    y,
                    last,
                    width.saturating_sub(4),
                    Style::default().fg(DIM_GRAY),
                );
                y += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobEvent;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_header_counts_finished_jobs() {
        let mut jobs = JobSet::new(["make", "make test"]);
        jobs.apply(JobEvent::Exited {
            id: 0,
            status: JobStatus::Succeeded,
        });

        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        JobPanel::new(&jobs).render(area, &mut buf);
        assert!(row(&buf, 0).contains("memeload  1/2 done"));
    }

    #[test]
    fn test_lists_commands_and_output() {
        let mut jobs = JobSet::new(["make"]);
        jobs.apply(JobEvent::Output {
            id: 0,
            line: "compiling foo".into(),
        });

        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        JobPanel::new(&jobs).render(area, &mut buf);
        assert!(row(&buf, 1).contains("make"));
        assert_eq!(buf[(1, 1)].fg, RUNNING_BLUE);
        assert!(row(&buf, 2).contains("compiling foo"));
        assert_eq!(buf[(4, 2)].fg, DIM_GRAY);
    }

    #[test]
    fn test_failed_job_shows_exit_code() {
        let mut jobs = JobSet::new(["false"]);
        jobs.apply(JobEvent::Exited {
            id: 0,
            status: JobStatus::Failed(1),
        });

        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        JobPanel::new(&jobs).render(area, &mut buf);
        assert!(row(&buf, 1).contains("(exit 1)"));
        assert_eq!(buf[(1, 1)].fg, ERROR_RED);
    }

    #[test]
    fn test_clips_to_area() {
        let jobs = JobSet::new(["a", "b", "c", "d"]);
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        JobPanel::new(&jobs).render(area, &mut buf);
        assert!(row(&buf, 1).contains('a'));
    }
}
