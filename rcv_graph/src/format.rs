// Number and text formatting shared by the tabulation views.
//
// Two renderings of vote counts coexist: `votify` keeps one decimal,
// `changify` (and `intify`) keep two. Both are in use and are kept apart.

/// Renders a whole value as an integer, anything else with two decimals.
pub fn intify(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Renders a fraction as a percentage with one decimal, for example `25.5%`.
///
/// Halves are rounded to the even neighbour.
pub fn percentify(v: f64) -> String {
    let tenths = (1000.0 * v).round_ties_even() / 10.0;
    format!("{:?}%", tenths)
}

/// Appends an "s" unless the count is exactly one.
pub fn pluralize(txt: &str, num: f64) -> String {
    if num == 1.0 {
        txt.to_string()
    } else {
        format!("{}s", txt)
    }
}

/// A signed difference: `+3`, `-2`, `+0`, `+1.50`.
pub fn changify(num: f64) -> String {
    let prefix = if num >= 0.0 { "+" } else { "" };
    format!("{}{}", prefix, intify(num))
}

/// A number of votes, with one decimal only when needed.
///
/// Always plural: use [pluralize] where the grammar matters.
pub fn votify(num: f64) -> String {
    let shown = if num.fract() != 0.0 {
        format!("{:?}", (num * 10.0).round_ties_even() / 10.0)
    } else {
        format!("{}", num as i64)
    };
    format!("{} votes", shown)
}

/// A signed difference of votes, for example `+15 votes`.
pub fn votify_change(num: f64) -> String {
    format!("{} votes", changify(num))
}

/// Joins the items as `a, b and c`, wrapped in the prefix and the suffix.
///
/// Returns an empty string when there is nothing to join.
pub fn andify<S: AsRef<str>>(prefix: &str, items: &[S], suffix: &str) -> String {
    let anded = match items {
        [] => return String::new(),
        [single] => single.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    };
    format!("{}{}{}", prefix, anded, suffix)
}
