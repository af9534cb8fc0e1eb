pub fn run() -> anyhow::Result<()> {
    println!("handoff {}", env!("CARGO_PKG_VERSION"));
    println!("Session handoff hooks for AI coding assistants");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
