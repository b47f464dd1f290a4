//! Natural ("human") string ordering: digit runs compare by numeric value,
//! so `mp3 < mp4 < mp10`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Sort in place using [`natural_cmp`].
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        // "01" after "1" keeps the order total
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_cmp_numeric_runs() {
        assert_eq!(natural_cmp("mp4", "mp10"), Ordering::Less);
        assert_eq!(natural_cmp("mp10", "mp4"), Ordering::Greater);
        assert_eq!(natural_cmp("jpg", "jpg"), Ordering::Equal);
        assert_eq!(natural_cmp("file01", "file1"), Ordering::Greater);
    }

    #[test]
    fn test_natural_sort_extensions() {
        let mut extensions = vec!["png", "mp10", "gif", "mp4", "jpeg", "jpg"];
        natural_sort(&mut extensions);
        assert_eq!(extensions, vec!["gif", "jpeg", "jpg", "mp4", "mp10", "png"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("tif", "tiff"), Ordering::Less);
    }
}
