//! Executable naming conventions for package commands

/// Prefix shared by all package executables
pub const EXECUTABLE_PREFIX: &str = "akamai";

/// Executable names a command may be published under, in lookup order.
///
/// `foo-bar` is looked up as `akamai-foo-bar` and then as `akamaiFooBar`.
pub fn candidate_names(command: &str) -> [String; 2] {
    let command = command.to_lowercase();
    [
        format!("{EXECUTABLE_PREFIX}-{command}"),
        format!("{EXECUTABLE_PREFIX}{}", camel_case(&command)),
    ]
}

fn camel_case(command: &str) -> String {
    command
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}
