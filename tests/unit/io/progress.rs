//! Tests for progress bar bookkeeping

#[cfg(test)]
mod tests {
    use filtergrid::io::progress::ProgressManager;

    // Tests hidden bars still count completed items
    // Verified by skipping the increment for hidden bars
    #[test]
    fn test_hidden_progress_counts() {
        let progress = ProgressManager::hidden(3);

        progress.advance();
        progress.advance();

        assert_eq!(progress.position(), 2);
        assert_eq!(progress.length(), Some(3));
        progress.finish();
    }

    // Tests visible bars are sized to the item count
    // Verified by creating bars with zero length
    #[test]
    fn test_visible_progress_length() {
        let progress = ProgressManager::new(10, "images");

        progress.advance();

        assert_eq!(progress.length(), Some(10));
        assert_eq!(progress.position(), 1);
        progress.finish();
    }
}
