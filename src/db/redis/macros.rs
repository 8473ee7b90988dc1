/// Read-through caching around an async block.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues its result for a background write with `$ttl` seconds
/// to live, and returns it. Errors from the cache read or the block
/// propagate with `?`.
///
/// ```rust,ignore
/// let places: Vec<Place> = cached!(self.cache, key, PLACES_CACHE_TTL, async {
///     self.search(cuisine).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await? {
            Some(hit) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(hit)
            }
            None => {
                tracing::debug!(key = %$key, "Cache miss");
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
