//! # TensorFlow-style "same" padding.
//!
//! Explicit padding ahead of an unpadded (`Valid`) conv or pool, so that
//! ``out_size = ceil(in_size / stride)`` for any input size, including
//! inputs smaller than the kernel.
use burn::prelude::{Backend, Tensor};

/// Total "same" padding along one axis.
///
/// ```text
/// pad = max((ceil(size / stride) - 1) * stride + kernel_size - size, 0)
/// ```
pub fn get_same_padding(
    size: usize,
    kernel_size: usize,
    stride: usize,
) -> usize {
    let out_size = size.div_ceil(stride);
    ((out_size.max(1) - 1) * stride + kernel_size).saturating_sub(size)
}

/// Pad a ``[batch, channels, height, width]`` input for "same" windows.
///
/// Odd totals put the extra cell on the bottom/right.
///
/// # Arguments
///
/// - `input`: ``[batch, channels, height, width]``.
/// - `kernel_size`: ``[height, width]`` window.
/// - `stride`: ``[height, width]`` stride.
/// - `value`: the fill value; ``0.0`` for convolutions, ``-inf`` for max pooling.
///
/// # Returns
///
/// ``[batch, channels, height + pad_h, width + pad_w]``
pub fn pad_same<B: Backend>(
    input: Tensor<B, 4>,
    kernel_size: [usize; 2],
    stride: [usize; 2],
    value: f32,
) -> Tensor<B, 4> {
    let [_, _, ih, iw] = input.dims();
    let pad_h = get_same_padding(ih, kernel_size[0], stride[0]);
    let pad_w = get_same_padding(iw, kernel_size[1], stride[1]);
    if pad_h == 0 && pad_w == 0 {
        return input;
    }
    input.pad(
        (pad_w / 2, pad_w - pad_w / 2, pad_h / 2, pad_h - pad_h / 2),
        value,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_get_same_padding() {
        assert_eq!(get_same_padding(10, 1, 1), 0);
        assert_eq!(get_same_padding(10, 3, 1), 2);
        assert_eq!(get_same_padding(10, 3, 2), 1);
        assert_eq!(get_same_padding(9, 3, 2), 2);
        assert_eq!(get_same_padding(2, 5, 1), 4);
        assert_eq!(get_same_padding(1, 3, 1), 2);
        assert_eq!(get_same_padding(1, 5, 1), 4);
    }

    #[test]
    fn test_pad_same_shapes() {
        let device = Default::default();
        let input: Tensor<TestBackend, 4> = Tensor::ones([2, 3, 1, 1], &device);

        assert_eq!(
            pad_same(input.clone(), [5, 5], [1, 1], 0.0).dims(),
            [2, 3, 5, 5]
        );
        assert_eq!(
            pad_same(input.clone(), [1, 3], [1, 1], 0.0).dims(),
            [2, 3, 1, 3]
        );
        assert_eq!(pad_same(input, [1, 1], [1, 1], 0.0).dims(), [2, 3, 1, 1]);
    }

    #[test]
    fn test_pad_same_fill() {
        let device = Default::default();
        let input: Tensor<TestBackend, 4> = Tensor::from_data([[[[1.0, 2.0]]]], &device);

        // One padding column in total; it goes right.
        let output = pad_same(input, [1, 3], [2, 2], -1.0);
        let expected: Tensor<TestBackend, 4> =
            Tensor::from_data([[[[1.0, 2.0, -1.0]]]], &device);
        output.to_data().assert_eq(&expected.to_data(), true);
    }
}
