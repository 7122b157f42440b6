pub fn now(_: i64) -> i64 {
    0
}
